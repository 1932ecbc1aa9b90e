use lettre::{
    message::{header::ContentType, Mailbox},
    Message,
};
use snafu::{OptionExt, ResultExt};

use crate::{error, Error, Notification};

fn mailbox(address: &str) -> Result<Mailbox, Error> {
    address.trim().parse().ok().context(error::InvalidAddressSnafu { address })
}

/// Builds the RFC 5322 message for `notification`.
///
/// `Bcc` is kept in the headers so that the provider can route it.
pub(crate) fn build_html_email(from: &str, notification: &Notification) -> Result<Message, Error> {
    let Notification::HtmlEmail { to, cc, bcc, subject, html } = notification;

    if to.is_empty() {
        return error::NoRecipientSnafu.fail();
    }

    let mut builder = Message::builder().from(mailbox(from)?).subject(subject.as_str());
    for address in to {
        builder = builder.to(mailbox(address)?);
    }
    for address in cc {
        builder = builder.cc(mailbox(address)?);
    }
    for address in bcc {
        builder = builder.bcc(mailbox(address)?);
    }

    builder
        .keep_bcc()
        .header(ContentType::TEXT_HTML)
        .body(html.clone())
        .context(error::BuildEmailSnafu)
}
