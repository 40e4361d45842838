//! How a link or category icon is drawn.
//!
//! Icons are stored as free text. A value shaped like a URL is an image;
//! anything else names a symbol from a fixed catalog, falling back to
//! [`FALLBACK_SYMBOL`] for names the catalog does not know.

use std::sync::LazyLock;

use nebula_types::Link;
use regex::Regex;
use url::form_urlencoded;

pub const FALLBACK_SYMBOL: &str = "Hash";

static URL_SHAPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(https?:)?//").expect("valid icon URL regex"));

/// Symbol names the dashboard can draw.
pub const SYMBOLS: &[&str] = &[
    "Search",
    "Plus",
    "Settings",
    "Bot",
    "ExternalLink",
    "Trash2",
    "Edit2",
    "X",
    "MessageSquare",
    "Send",
    "Loader2",
    "Github",
    "Grid",
    "Command",
    "Sparkles",
    "Check",
    "Save",
    "RotateCcw",
    "FileJson",
    "Download",
    "Upload",
    "UploadCloud",
    "Menu",
    "List",
    "MoreHorizontal",
    "ArrowRight",
    "ArrowUpRight",
    "AlertTriangle",
    "ChevronDown",
    "ChevronUp",
    "Code",
    "Terminal",
    "Hash",
    "Cpu",
    "Database",
    "Server",
    "Cloud",
    "Laptop",
    "Smartphone",
    "Monitor",
    "Wifi",
    "Bluetooth",
    "HardDrive",
    "Keyboard",
    "Mouse",
    "Printer",
    "Battery",
    "Cast",
    "Palette",
    "Layout",
    "Image",
    "Video",
    "Music",
    "Mic",
    "Headphones",
    "Camera",
    "Play",
    "Pause",
    "Volume2",
    "Film",
    "Radio",
    "PenTool",
    "Layers",
    "Crop",
    "Move",
    "Type",
    "Droplet",
    "Zap",
    "Globe",
    "Mail",
    "Calendar",
    "Clock",
    "FileText",
    "Folder",
    "FolderOpen",
    "Archive",
    "Briefcase",
    "Paperclip",
    "Calculator",
    "PieChart",
    "BarChart",
    "Activity",
    "Bell",
    "Twitter",
    "Facebook",
    "Instagram",
    "Linkedin",
    "Youtube",
    "Twitch",
    "MessageCircle",
    "Share2",
    "Wrench",
    "Hammer",
    "Pen",
    "Key",
    "Lock",
    "Shield",
    "Eye",
    "Home",
    "Link",
    "Link2",
    "Heart",
    "Star",
    "Sun",
    "Moon",
    "User",
    "Users",
    "ShoppingCart",
    "CreditCard",
    "MapPin",
    "Coffee",
    "Gift",
    "Flag",
    "Bookmark",
    "Book",
    "Gamepad",
    "Gamepad2",
    "Rocket",
    "Anchor",
    "Truck",
    "Plane",
    "Wallet",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSource {
    /// No icon set: fetch the site's favicon.
    Favicon(String),
    Image(String),
    Symbol(&'static str),
}

#[must_use]
pub fn is_url_shaped(icon: &str) -> bool {
    URL_SHAPED.is_match(icon)
}

/// Catalog entry for `name`, or the fallback symbol.
#[must_use]
pub fn resolve_symbol(name: &str) -> &'static str {
    SYMBOLS
        .iter()
        .copied()
        .find(|symbol| *symbol == name)
        .unwrap_or(FALLBACK_SYMBOL)
}

#[must_use]
pub fn favicon_url(site: &str) -> String {
    let domain: String = form_urlencoded::byte_serialize(site.as_bytes()).collect();
    format!("https://www.google.com/s2/favicons?domain={domain}&sz=128")
}

#[must_use]
pub fn resolve_link_icon(link: &Link) -> IconSource {
    match link.icon.as_deref().filter(|icon| !icon.is_empty()) {
        None => IconSource::Favicon(favicon_url(&link.url)),
        Some(icon) if is_url_shaped(icon) => IconSource::Image(icon.to_string()),
        Some(name) => IconSource::Symbol(resolve_symbol(name)),
    }
}

/// Category icons are always symbols.
#[must_use]
pub fn resolve_category_icon(icon: Option<&str>) -> &'static str {
    icon.map_or(FALLBACK_SYMBOL, resolve_symbol)
}
