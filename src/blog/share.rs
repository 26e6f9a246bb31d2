use serde::Serialize;
use url::form_urlencoded::byte_serialize;

/// Social share targets for a post page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLinks {
    pub facebook: String,
    pub x: String,
    pub whatsapp: String,
    pub linkedin: String,
    pub email: String,
}

impl ShareLinks {
    pub fn new(page_url: &str, title: &str) -> Self {
        let url = encode(page_url);
        let text = encode(title);
        Self {
            facebook: format!("https://www.facebook.com/sharer/sharer.php?u={url}"),
            x: format!("https://twitter.com/intent/tweet?text={text}&url={url}"),
            whatsapp: format!(
                "https://wa.me/?text={}",
                encode(&format!("{title} {page_url}"))
            ),
            linkedin: format!("https://www.linkedin.com/sharing/share-offsite/?url={url}"),
            email: format!("mailto:?subject={text}&body={url}"),
        }
    }

    /// `(label, href)` pairs in display order.
    pub fn targets(&self) -> [(&'static str, &str); 5] {
        [
            ("Facebook", &self.facebook),
            ("X", &self.x),
            ("WhatsApp", &self.whatsapp),
            ("LinkedIn", &self.linkedin),
            ("Email", &self.email),
        ]
    }
}

/// Percent-encodes a query component. Spaces become `%20` so mail clients
/// don't show literal plus signs.
fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
