// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Badge and stats-card URL builders.
//!
//! Every function here is pure: given the same input it returns the same
//! Markdown or URL, which keeps rendered documents reproducible. Badges are
//! served by shields.io; stats cards by the public github-readme-stats family
//! of services.

const SHIELDS_BASE: &str = "https://img.shields.io/badge";
const DEFAULT_COLOR: &str = "007acc";

/// Visual style understood by shields.io.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeStyle {
    Plastic,
    Flat,
    FlatSquare,
    ForTheBadge,
    Social
}

impl BadgeStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plastic => "plastic",
            Self::Flat => "flat",
            Self::FlatSquare => "flat-square",
            Self::ForTheBadge => "for-the-badge",
            Self::Social => "social"
        }
    }
}

/// Label/message badge.
///
/// # Examples
///
/// ```
/// use profile_dynamo::{Badge, BadgeStyle};
///
/// let markdown = Badge::new("Stars", "1,024")
///     .color("#ffaa00")
///     .style(BadgeStyle::Flat)
///     .logo("github")
///     .to_markdown();
/// assert_eq!(
///     markdown,
///     "![Stars](https://img.shields.io/badge/Stars-1%2C024-ffaa00?style=flat&logo=github&logoColor=white)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge<'a> {
    label:      &'a str,
    message:    &'a str,
    color:      &'a str,
    style:      BadgeStyle,
    logo:       Option<&'a str>,
    logo_color: &'a str
}

impl<'a> Badge<'a> {
    /// Badge with the default colour, `for-the-badge` style and no logo.
    pub fn new(label: &'a str, message: &'a str) -> Self {
        Self {
            label,
            message,
            color: DEFAULT_COLOR,
            style: BadgeStyle::ForTheBadge,
            logo: None,
            logo_color: "white"
        }
    }

    /// Background colour, with or without a leading `#`.
    pub fn color(mut self, color: &'a str) -> Self {
        self.color = color;
        self
    }

    pub fn style(mut self, style: BadgeStyle) -> Self {
        self.style = style;
        self
    }

    /// Simple Icons slug shown before the label.
    pub fn logo(mut self, logo: &'a str) -> Self {
        self.logo = Some(logo);
        self
    }

    pub fn logo_color(mut self, logo_color: &'a str) -> Self {
        self.logo_color = logo_color;
        self
    }

    /// Image URL of the badge. An empty message yields a label-only badge.
    pub fn url(&self) -> String {
        let color = encode_component(self.color.trim_start_matches('#'));
        let content = if self.message.is_empty() {
            format!("{}-{color}", shields_segment(self.label))
        } else {
            format!("{}-{}-{color}", shields_segment(self.label), shields_segment(self.message))
        };
        let mut url = format!("{SHIELDS_BASE}/{content}?style={}", self.style.as_str());
        if let Some(logo) = self.logo {
            url.push_str("&logo=");
            url.push_str(&encode_component(logo));
            url.push_str("&logoColor=");
            url.push_str(&encode_component(self.logo_color));
        }
        url
    }

    /// Markdown image of the badge.
    pub fn to_markdown(&self) -> String {
        format!("![{}]({})", self.label, self.url())
    }
}

const TECH_COLORS: &[(&str, &str, &str)] = &[
    ("JavaScript", "000000", "javascript"),
    ("TypeScript", "005a9c", "typescript"),
    ("Python", "2b5b84", "python"),
    ("Java", "005e7c", "openjdk"),
    ("C++", "00599c", "cplusplus"),
    ("C#", "1a6e17", "dotnet"),
    ("C", "283593", "c"),
    ("PHP", "4f5b93", "php"),
    ("Ruby", "701516", "ruby"),
    ("Go", "006782", "go"),
    ("Rust", "000000", "rust"),
    ("Swift", "c66700", "swift"),
    ("Kotlin", "6a40d9", "kotlin"),
    ("Shell", "2d4a2b", "gnubash"),
    ("React", "20232a", "react"),
    ("Vue", "34495e", "vuedotjs"),
    ("Angular", "c3002b", "angular"),
    ("Node.js", "2d6a2b", "nodedotjs"),
    ("Express.js", "000000", "express"),
    ("Django", "092e20", "django"),
    ("Flask", "000000", "flask"),
    ("Spring", "428b1e", "spring"),
    ("Docker", "1d76bb", "docker"),
    ("Kubernetes", "2555b0", "kubernetes"),
    ("AWS", "232f3e", "amazonwebservices"),
    ("MongoDB", "348335", "mongodb"),
    ("PostgreSQL", "2a5578", "postgresql"),
    ("MySQL", "005c84", "mysql"),
    ("Redis", "c73228", "redis"),
    ("Git", "c43a20", "git"),
    ("Linux", "000000", "linux"),
    ("HTML", "ca421c", "html5"),
    ("CSS", "105a96", "css3"),
    ("SCSS", "a53d6d", "sass"),
    ("Tailwind CSS", "03697c", "tailwindcss"),
    ("Next.js", "000000", "nextdotjs"),
    ("Svelte", "e03700", "svelte"),
    ("GraphQL", "b30078", "graphql"),
    ("Tokio", "000000", "rust"),
    ("Jest", "c21325", "jest"),
    ("Vite", "4a50d6", "vite"),
    ("Webpack", "1563a0", "webpack")
];

/// Technology badge using a known colour and logo when available.
///
/// Unknown technologies get the default colour and no logo.
pub fn tech_badge(name: &str) -> String {
    let known = TECH_COLORS
        .iter()
        .find(|(technology, ..)| technology.eq_ignore_ascii_case(name));

    let mut url = match known {
        Some((_, color, _)) => format!("{SHIELDS_BASE}/{}-{color}?style=flat", shields_segment(name)),
        None => format!("{SHIELDS_BASE}/{}-{DEFAULT_COLOR}?style=flat", shields_segment(name))
    };
    if let Some((_, _, logo)) = known {
        url.push_str("&logo=");
        url.push_str(logo);
        url.push_str("&logoColor=white");
    }

    format!("![{name}]({url})")
}

/// Numeric badge with thousands separators.
pub fn count_badge(label: &str, count: u64, color: &str) -> String {
    let formatted = crate::insights::format_number(count);
    Badge::new(label, &formatted).color(color).to_markdown()
}

/// Language share badge, e.g. `Rust | 42.00%`.
pub fn percentage_badge(language: &str, percentage: &str) -> String {
    let message = format!("{percentage}%");
    Badge::new(language, &message)
        .style(BadgeStyle::FlatSquare)
        .to_markdown()
}

const SOCIAL_PLATFORMS: &[(&str, &str, &str, &str)] = &[
    ("linkedin", "LinkedIn", "0077B5", "linkedin"),
    ("github", "GitHub", "121011", "github"),
    ("twitter", "Twitter", "1DA1F2", "x"),
    ("instagram", "Instagram", "E4405F", "instagram"),
    ("stackoverflow", "Stack Overflow", "FE7A16", "stackoverflow"),
    ("website", "Website", "000000", "aboutdotme"),
    ("blog", "Blog", "12100E", "hashnode")
];

/// Linked badge for a social profile. Unknown platforms use their own name
/// as label and no logo.
pub fn social_badge(platform: &str, url: &str) -> String {
    let image = match SOCIAL_PLATFORMS
        .iter()
        .find(|(key, ..)| key.eq_ignore_ascii_case(platform))
    {
        Some((_, label, color, logo)) => Badge::new(label, "")
            .color(color)
            .logo(logo)
            .to_markdown(),
        None => Badge::new(platform, "").to_markdown()
    };

    format!("[{image}]({url})")
}

/// github-readme-stats summary card.
pub fn stats_card_url(username: &str) -> String {
    format!(
        "https://github-readme-stats.vercel.app/api?{}&show_icons=true&rank_icon=github",
        card_params(username)
    )
}

/// Contribution streak card.
pub fn streak_stats_url(username: &str) -> String {
    format!(
        "https://github-readme-streak-stats.herokuapp.com/?user={}&theme=dark&hide_border=false",
        encode_component(username)
    )
}

/// Compact top-languages card listing eight languages.
pub fn top_languages_card_url(username: &str) -> String {
    format!(
        "https://github-readme-stats.vercel.app/api/top-langs/?{}&layout=compact&langs_count=8",
        card_params(username)
    )
}

/// Trophy shelf.
pub fn trophies_url(username: &str) -> String {
    format!(
        "https://github-profile-trophy.vercel.app/?username={}&theme=radical&no-frame=false&no-bg=true&margin-w=4",
        encode_component(username)
    )
}

fn card_params(username: &str) -> String {
    format!(
        "username={}&theme=dark&hide_border=false&include_all_commits=false&count_private=false",
        encode_component(username)
    )
}

/// Escapes a shields.io path segment: literal `-` and `_` are doubled, then
/// the result is percent-encoded.
fn shields_segment(value: &str) -> String {
    encode_component(&value.replace('-', "--").replace('_', "__"))
}

fn encode_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(char::from(byte));
            }
            _ => encoded.push_str(&format!("%{byte:02X}"))
        }
    }
    encoded
}
