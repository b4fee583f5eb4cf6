use serde::{Deserialize, Serialize};

/// Printable document layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// One 100x150mm label per box.
    Label,
    /// A4 cover page plus paginated box details.
    #[serde(alias = "a4")]
    Manifest,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Label => "label",
            Layout::Manifest => "manifest",
        }
    }

    /// Prefix of the document title, followed by ` - <code>`.
    pub fn title_prefix(&self) -> &'static str {
        match self {
            Layout::Label => "Labels",
            Layout::Manifest => "Packing List",
        }
    }

    pub(crate) fn paper(&self) -> Paper {
        match self {
            Layout::Label => Paper {
                width: "100mm",
                height: "150mm",
                margin: "5mm",
                body_font: "9pt",
                cell_font: "8pt",
                sizes_font: "7pt",
            },
            Layout::Manifest => Paper {
                width: "210mm",
                height: "297mm",
                margin: "10mm",
                body_font: "10pt",
                cell_font: "9pt",
                sizes_font: "8pt",
            },
        }
    }
}

impl core::fmt::Display for Layout {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown layout: {0} (expected `label`, `manifest` or `a4`)")]
pub struct UnknownLayout(pub String);

impl core::str::FromStr for Layout {
    type Err = UnknownLayout;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "label" | "labels" => Ok(Layout::Label),
            "manifest" | "a4" => Ok(Layout::Manifest),
            _ => Err(UnknownLayout(s.to_string())),
        }
    }
}

/// Paper geometry and font sizes for one layout.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Paper {
    pub width: &'static str,
    pub height: &'static str,
    pub margin: &'static str,
    pub body_font: &'static str,
    pub cell_font: &'static str,
    pub sizes_font: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_is_an_alias_for_manifest() {
        assert_eq!("a4".parse::<Layout>().unwrap(), Layout::Manifest);
        assert_eq!(" Label ".parse::<Layout>().unwrap(), Layout::Label);
        assert!("poster".parse::<Layout>().is_err());

        let parsed: Layout = serde_json::from_str("\"a4\"").unwrap();
        assert_eq!(parsed, Layout::Manifest);
        assert_eq!(serde_json::to_string(&Layout::Label).unwrap(), "\"label\"");
    }
}
