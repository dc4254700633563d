use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::domain::IsoMonth;
use crate::error::GpadError;

pub const ANNEX_MARKER: &str = "Annex 1";
pub const FORMAT_MARKER: &str = "CSV";

static CARD_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.nhsd-m-download-card").expect("download card selector should parse")
});
static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("title selector should parse"));
static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("link selector should parse"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadCard {
    pub title: String,
    pub href: Option<String>,
}

impl DownloadCard {
    pub fn is_annex_csv(&self) -> bool {
        self.title.contains(ANNEX_MARKER) && self.title.contains(FORMAT_MARKER)
    }
}

/// Publication page for a month: `<base>/<month-name>-<year>`.
pub fn page_url(base_url: &str, month: &IsoMonth) -> String {
    let (name, year) = month.decompose();
    format!("{}/{name}-{year}", base_url.trim_end_matches('/'))
}

pub fn download_cards(html: &str) -> Vec<DownloadCard> {
    let document = Html::parse_document(html);
    document
        .select(&CARD_SELECTOR)
        .map(|card| DownloadCard {
            title: card
                .select(&TITLE_SELECTOR)
                .next()
                .map(collapsed_text)
                .unwrap_or_default(),
            href: card
                .select(&LINK_SELECTOR)
                .next()
                .and_then(|link| link.value().attr("href"))
                .map(|href| href.trim().to_string()),
        })
        .collect()
}

/// Pick the Annex 1 CSV link from a publication page.
pub fn select_download_link(html: &str) -> Result<String, GpadError> {
    let cards = download_cards(html);
    if cards.is_empty() {
        return Err(GpadError::NoDownloads);
    }
    let card = cards
        .iter()
        .find(|card| card.is_annex_csv())
        .ok_or(GpadError::NoAnnexDownload { found: cards.len() })?;
    card.href
        .clone()
        .ok_or_else(|| GpadError::MissingHref(card.title.clone()))
}

/// Resolve a card link against the page it was found on.
pub fn resolve_link(page_url: &str, href: &str) -> Result<String, GpadError> {
    let base = Url::parse(page_url).map_err(|err| GpadError::InvalidUrl {
        url: page_url.to_string(),
        message: err.to_string(),
    })?;
    base.join(href)
        .map(|url| url.to_string())
        .map_err(|err| GpadError::InvalidUrl {
            url: href.to_string(),
            message: err.to_string(),
        })
}

fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_whitespace_is_collapsed() {
        let html = r#"<div class="nhsd-m-download-card"><p>
            Appointments in General Practice,
            Annex 1 [CSV]
        </p><a href="/x.zip">x</a></div>"#;
        let cards = download_cards(html);
        assert_eq!(
            cards[0].title,
            "Appointments in General Practice, Annex 1 [CSV]"
        );
        assert!(cards[0].is_annex_csv());
    }

    #[test]
    fn relative_links_are_joined() {
        let link = resolve_link(
            "https://digital.nhs.uk/publications/october-2025",
            "/media/annex1.zip",
        )
        .unwrap();
        assert_eq!(link, "https://digital.nhs.uk/media/annex1.zip");
    }
}
