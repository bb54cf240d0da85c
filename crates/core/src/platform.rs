//! Platform catalog: the closed set of widgets a profile can place.
//!
//! Each [`Platform`] maps to a static [`PlatformDescriptor`] carrying its
//! display name, icon key, default footprint and colour palette. Unknown
//! platform keys are rejected instead of falling back to a generic widget.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::grid::GridSize;

// ---------------------------------------------------------------------------
// Widget kinds
// ---------------------------------------------------------------------------

/// Coarse widget category, persisted as `widget_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Profile,
    Social,
    Service,
}

impl WidgetKind {
    /// Parse from the storage `widget_type` column.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "profile" => Ok(Self::Profile),
            "social" => Ok(Self::Social),
            "service" => Ok(Self::Service),
            other => Err(CoreError::Validation(format!(
                "Unknown widget type '{other}'. Must be one of: profile, social, service"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Social => "social",
            Self::Service => "service",
        }
    }
}

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

/// Default colours used when a widget has no custom colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorPalette {
    pub background: &'static str,
    pub foreground: &'static str,
    pub accent: &'static str,
}

/// Static rendering and sizing information for one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformDescriptor {
    pub display_name: &'static str,
    pub icon: &'static str,
    pub kind: WidgetKind,
    pub default_size: GridSize,
    pub palette: ColorPalette,
    /// Required prefix of a user-supplied destination URL. Only service
    /// widgets accept an integration URL.
    pub integration_url_prefix: Option<&'static str>,
}

const fn size(width: u32, height: u32) -> GridSize {
    GridSize { width, height }
}

const fn palette(
    background: &'static str,
    foreground: &'static str,
    accent: &'static str,
) -> ColorPalette {
    ColorPalette {
        background,
        foreground,
        accent,
    }
}

// ---------------------------------------------------------------------------
// Platforms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Profile,
    Instagram,
    Twitter,
    Github,
    Linkedin,
    Youtube,
    Tiktok,
    Medium,
    Substack,
    Calendly,
    Buymeacoffee,
}

impl Platform {
    /// Every supported platform, in the order shown by the add-widget panel.
    pub const ALL: &'static [Platform] = &[
        Platform::Profile,
        Platform::Instagram,
        Platform::Twitter,
        Platform::Github,
        Platform::Linkedin,
        Platform::Youtube,
        Platform::Tiktok,
        Platform::Medium,
        Platform::Substack,
        Platform::Calendly,
        Platform::Buymeacoffee,
    ];

    /// Parse a storage / wire key such as `"instagram"`.
    pub fn from_key(key: &str) -> Result<Self, CoreError> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.key() == key)
            .ok_or_else(|| CoreError::Validation(format!("Unknown platform '{key}'")))
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Instagram => "instagram",
            Self::Twitter => "twitter",
            Self::Github => "github",
            Self::Linkedin => "linkedin",
            Self::Youtube => "youtube",
            Self::Tiktok => "tiktok",
            Self::Medium => "medium",
            Self::Substack => "substack",
            Self::Calendly => "calendly",
            Self::Buymeacoffee => "buymeacoffee",
        }
    }

    pub fn kind(self) -> WidgetKind {
        self.descriptor().kind
    }

    pub fn default_size(self) -> GridSize {
        self.descriptor().default_size
    }

    pub fn descriptor(self) -> &'static PlatformDescriptor {
        match self {
            Self::Profile => &PROFILE,
            Self::Instagram => &INSTAGRAM,
            Self::Twitter => &TWITTER,
            Self::Github => &GITHUB,
            Self::Linkedin => &LINKEDIN,
            Self::Youtube => &YOUTUBE,
            Self::Tiktok => &TIKTOK,
            Self::Medium => &MEDIUM,
            Self::Substack => &SUBSTACK,
            Self::Calendly => &CALENDLY,
            Self::Buymeacoffee => &BUYMEACOFFEE,
        }
    }
}

static PROFILE: PlatformDescriptor = PlatformDescriptor {
    display_name: "Profile",
    icon: "user",
    kind: WidgetKind::Profile,
    default_size: size(4, 2),
    palette: palette("#ffffff", "#111827", "#6366f1"),
    integration_url_prefix: None,
};

static INSTAGRAM: PlatformDescriptor = PlatformDescriptor {
    display_name: "Instagram",
    icon: "instagram",
    kind: WidgetKind::Social,
    default_size: size(2, 2),
    palette: palette("#fdf2f8", "#831843", "#e1306c"),
    integration_url_prefix: None,
};

static TWITTER: PlatformDescriptor = PlatformDescriptor {
    display_name: "Twitter",
    icon: "twitter",
    kind: WidgetKind::Social,
    default_size: size(2, 2),
    palette: palette("#eff6ff", "#0c4a6e", "#1da1f2"),
    integration_url_prefix: None,
};

static GITHUB: PlatformDescriptor = PlatformDescriptor {
    display_name: "GitHub",
    icon: "github",
    kind: WidgetKind::Social,
    default_size: size(2, 2),
    palette: palette("#f6f8fa", "#24292f", "#2da44e"),
    integration_url_prefix: None,
};

static LINKEDIN: PlatformDescriptor = PlatformDescriptor {
    display_name: "LinkedIn",
    icon: "linkedin",
    kind: WidgetKind::Social,
    default_size: size(2, 1),
    palette: palette("#eff6ff", "#1e3a8a", "#0a66c2"),
    integration_url_prefix: None,
};

static YOUTUBE: PlatformDescriptor = PlatformDescriptor {
    display_name: "YouTube",
    icon: "youtube",
    kind: WidgetKind::Social,
    default_size: size(4, 2),
    palette: palette("#fef2f2", "#7f1d1d", "#ff0000"),
    integration_url_prefix: None,
};

static TIKTOK: PlatformDescriptor = PlatformDescriptor {
    display_name: "TikTok",
    icon: "tiktok",
    kind: WidgetKind::Social,
    default_size: size(2, 2),
    palette: palette("#f5f5f5", "#010101", "#ee1d52"),
    integration_url_prefix: None,
};

static MEDIUM: PlatformDescriptor = PlatformDescriptor {
    display_name: "Medium",
    icon: "medium",
    kind: WidgetKind::Social,
    default_size: size(2, 2),
    palette: palette("#fafafa", "#111111", "#000000"),
    integration_url_prefix: None,
};

static SUBSTACK: PlatformDescriptor = PlatformDescriptor {
    display_name: "Substack",
    icon: "substack",
    kind: WidgetKind::Social,
    default_size: size(2, 2),
    palette: palette("#fff7ed", "#7c2d12", "#ff6719"),
    integration_url_prefix: None,
};

static CALENDLY: PlatformDescriptor = PlatformDescriptor {
    display_name: "Calendly",
    icon: "calendar",
    kind: WidgetKind::Service,
    default_size: size(2, 1),
    palette: palette("#eff6ff", "#0b3558", "#006bff"),
    integration_url_prefix: Some("https://calendly.com/"),
};

static BUYMEACOFFEE: PlatformDescriptor = PlatformDescriptor {
    display_name: "Buy Me a Coffee",
    icon: "coffee",
    kind: WidgetKind::Service,
    default_size: size(2, 1),
    palette: palette("#fefce8", "#422006", "#ffdd00"),
    integration_url_prefix: Some("https://buymeacoffee.com/"),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_round_trips() {
        for platform in Platform::ALL {
            assert_eq!(Platform::from_key(platform.key()).unwrap(), *platform);
        }
    }

    #[test]
    fn unknown_key_rejected() {
        let err = Platform::from_key("myspace").unwrap_err();
        assert!(err.to_string().contains("myspace"));
        assert!(Platform::from_key("").is_err());
        assert!(Platform::from_key("GitHub").is_err());
    }

    #[test]
    fn only_service_platforms_take_integration_urls() {
        for platform in Platform::ALL {
            let d = platform.descriptor();
            assert_eq!(
                d.integration_url_prefix.is_some(),
                d.kind == WidgetKind::Service,
                "{}",
                platform.key()
            );
        }
    }

    #[test]
    fn default_sizes_are_at_least_one_cell() {
        for platform in Platform::ALL {
            let s = platform.default_size();
            assert!(s.width >= 1 && s.height >= 1);
        }
    }

    #[test]
    fn serde_uses_platform_keys() {
        let json = serde_json::to_string(&Platform::Buymeacoffee).unwrap();
        assert_eq!(json, "\"buymeacoffee\"");
        let kind: WidgetKind = serde_json::from_str("\"service\"").unwrap();
        assert_eq!(kind, WidgetKind::Service);
    }

    #[test]
    fn widget_kind_names() {
        assert_eq!(WidgetKind::from_name("social").unwrap(), WidgetKind::Social);
        assert_eq!(WidgetKind::Profile.as_str(), "profile");
        assert!(WidgetKind::from_name("banner").is_err());
    }
}
