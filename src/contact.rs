use anyhow::Context as _;
use kuchiki::NodeRef;
use url::Url;

use crate::dom;
use crate::slots::{Slot, SlotMap};

pub const DEFAULT_RECIPIENT: &str = "mbgada@andrew.cmu.edu";

const GMAIL_COMPOSE: &str = "https://mail.google.com/mail/?view=cm&fs=1&tf=1";
const SUBJECT: &str = "Contact via website";

/// Field values of the contact form for one submit/click.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub email: String,
    pub message: String,
}

impl ContactDraft {
    pub fn new(email: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            message: message.into(),
        }
    }

    /// Reads the draft from the form fields in `doc`. Absent inputs read as
    /// empty strings.
    pub fn from_form(doc: &NodeRef, slots: &SlotMap) -> Self {
        let email = slots
            .find(doc, Slot::ContactEmail)
            .map(|n| field_value(&n))
            .unwrap_or_default();
        let message = slots
            .find(doc, Slot::ContactMessage)
            .map(|n| field_value(&n))
            .unwrap_or_default();
        Self { email, message }
    }

    fn body(&self) -> String {
        format!("{}\n\nFrom: {}", self.message, self.email)
    }
}

/// `<textarea>` content or an input's `value` attribute.
fn field_value(node: &NodeRef) -> String {
    if dom::is_element(node, "textarea") {
        node.text_contents()
    } else {
        dom::get_attr(node, "value").unwrap_or_default()
    }
}

/// Where the browser goes after a contact action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Replace the current location.
    Assign(String),
    /// Open a new browsing context.
    Open {
        url: String,
        target: &'static str,
        features: &'static str,
    },
}

impl Navigation {
    pub fn url(&self) -> &str {
        match self {
            Navigation::Assign(url) => url,
            Navigation::Open { url, .. } => url,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContactLinkBuilder {
    recipient: String,
}

impl Default for ContactLinkBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_RECIPIENT)
    }
}

impl ContactLinkBuilder {
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
        }
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn mailto_href(&self, draft: &ContactDraft) -> String {
        let visitor = if draft.email.is_empty() {
            "visitor"
        } else {
            draft.email.as_str()
        };
        let subject = format!("{SUBJECT} ({visitor})");
        format!(
            "mailto:{}?subject={}&body={}",
            encode_component(&self.recipient),
            encode_component(&subject),
            encode_component(&draft.body())
        )
    }

    pub fn gmail_href(&self, draft: &ContactDraft) -> anyhow::Result<String> {
        let mut url = Url::parse(GMAIL_COMPOSE).context("parse gmail compose url")?;
        url.query_pairs_mut()
            .append_pair("to", &self.recipient)
            .append_pair("su", SUBJECT)
            .append_pair("body", &draft.body());
        Ok(url.into())
    }

    /// Form submission: default navigation is replaced by the `mailto:` URL.
    pub fn on_submit(&self, draft: &ContactDraft) -> Navigation {
        Navigation::Assign(self.mailto_href(draft))
    }

    /// Gmail link click: opens compose in a new tab.
    pub fn on_gmail_click(&self, draft: &ContactDraft) -> anyhow::Result<Navigation> {
        Ok(Navigation::Open {
            url: self.gmail_href(draft)?,
            target: "_blank",
            features: "noopener",
        })
    }

    /// Gives a page's contact form a working fallback without scripts: the
    /// form posts to `mailto:` and the Gmail link opens an empty compose.
    /// Returns `false` when the page has no contact form.
    pub fn wire_page(&self, doc: &NodeRef, slots: &SlotMap) -> anyhow::Result<bool> {
        let Some(form) = slots.find(doc, Slot::ContactForm) else {
            return Ok(false);
        };
        dom::set_attr(
            &form,
            "action",
            &format!("mailto:{}", encode_component(&self.recipient)),
        );
        dom::set_attr(&form, "data-recipient", &self.recipient);

        if let Some(gmail) = slots.find(doc, Slot::ContactGmail) {
            dom::set_href(&gmail, &self.gmail_href(&ContactDraft::default())?);
            dom::set_attr(&gmail, "target", "_blank");
            dom::set_attr(&gmail, "rel", "noopener");
        }
        Ok(true)
    }
}

/// Percent-encodes a URI component, spaces as `%20`.
fn encode_component(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuchiki::traits::TendrilSink as _;

    fn query(url: &str) -> Vec<(String, String)> {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn param(pairs: &[(String, String)], key: &str) -> String {
        pairs.iter().find(|(k, _)| k == key).unwrap().1.clone()
    }

    #[test]
    fn submit_builds_mailto() {
        let builder = ContactLinkBuilder::new("me@example.com");
        let nav = builder.on_submit(&ContactDraft::new("a@b.com", "hello"));
        let Navigation::Assign(url) = &nav else {
            panic!("expected assign, got {nav:?}");
        };
        assert!(url.starts_with("mailto:me%40example.com?"));
        assert!(!url.contains('+'));

        let pairs = query(url);
        assert!(param(&pairs, "subject").contains("a@b.com"));
        let body = param(&pairs, "body");
        assert!(body.contains("hello"));
        assert!(body.ends_with("From: a@b.com"));
    }

    #[test]
    fn empty_draft_falls_back_to_visitor() {
        let href = ContactLinkBuilder::default().mailto_href(&ContactDraft::default());
        let pairs = query(&href);
        assert_eq!(param(&pairs, "subject"), "Contact via website (visitor)");
        assert_eq!(param(&pairs, "body"), "\n\nFrom: ");
    }

    #[test]
    fn gmail_opens_new_tab() {
        let builder = ContactLinkBuilder::new("me@example.com");
        let nav = builder
            .on_gmail_click(&ContactDraft::new("a@b.com", "hi there"))
            .unwrap();
        let Navigation::Open { url, target, features } = &nav else {
            panic!("expected open, got {nav:?}");
        };
        assert_eq!(*target, "_blank");
        assert_eq!(*features, "noopener");
        assert!(url.starts_with("https://mail.google.com/mail/?view=cm&fs=1&tf=1&to="));
        let pairs = query(url);
        assert_eq!(param(&pairs, "to"), "me@example.com");
        assert_eq!(param(&pairs, "su"), "Contact via website");
        assert_eq!(param(&pairs, "body"), "hi there\n\nFrom: a@b.com");
    }

    #[test]
    fn draft_reads_form_fields() {
        let doc = kuchiki::parse_html().one(
            r#"<form id="contactFormSimple">
                 <input id="contactEmail" value="a@b.com">
                 <textarea id="contactMessage">hello</textarea>
               </form>"#,
        );
        let draft = ContactDraft::from_form(&doc, &SlotMap::default());
        assert_eq!(draft, ContactDraft::new("a@b.com", "hello"));

        let empty = kuchiki::parse_html().one("<p>no form</p>");
        assert_eq!(
            ContactDraft::from_form(&empty, &SlotMap::default()),
            ContactDraft::default()
        );
    }

    #[test]
    fn wire_page_sets_fallbacks() {
        let doc = kuchiki::parse_html().one(
            r#"<form id="contactFormSimple"></form><a id="contactGmail" href="">Gmail</a>"#,
        );
        let builder = ContactLinkBuilder::new("me@example.com");
        assert!(builder.wire_page(&doc, &SlotMap::default()).unwrap());
        let form = doc.select_first("form").unwrap();
        assert_eq!(
            form.attributes.borrow().get("action"),
            Some("mailto:me%40example.com")
        );
        let gmail = doc.select_first("#contactGmail").unwrap();
        assert_eq!(gmail.attributes.borrow().get("target"), Some("_blank"));
    }
}
