use super::constants::{FIFT_EXT, TLB_EXT, TOLK_EXT};

/// A language the analyzer has a binding for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Language {
    /// High-level contract language.
    Tolk,
    /// Binary-schema description language.
    Tlb,
    /// Stack-machine assembly.
    Fift,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Tolk, Language::Tlb, Language::Fift];

    /// Detect the language from a uri or path by its extension.
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = path.rsplit_once('.')?.1;
        match ext {
            TOLK_EXT => Some(Language::Tolk),
            TLB_EXT => Some(Language::Tlb),
            FIFT_EXT => Some(Language::Fift),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Language::Tolk => TOLK_EXT,
            Language::Tlb => TLB_EXT,
            Language::Fift => FIFT_EXT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_path() {
        assert_eq!(Language::from_path("/ws/main.tolk"), Some(Language::Tolk));
        assert_eq!(Language::from_path("block.tlb"), Some(Language::Tlb));
        assert_eq!(Language::from_path("out/contract.fif"), Some(Language::Fift));
        assert_eq!(Language::from_path("README.md"), None);
        assert_eq!(Language::from_path("Makefile"), None);
    }
}
