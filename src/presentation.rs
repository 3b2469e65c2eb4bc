//! # Presentation
//!
//! Turns the result of one interaction into what the user sees: a few
//! status lines and, when a track was found, a player embed reference.
//!
//! Rendering writes into any [`std::io::Write`], stdout in the binary and
//! a buffer in tests.

use crate::catalog::TrackId;
use crate::error::RecommendError;
use crate::recommender::Recommendation;
use crate::resolver::{Pick, PickOrigin};
use std::fmt;
use std::io::{self, Write};

const EMBED_BASE_URL: &str = "https://open.spotify.com/embed/track";
const EMBED_WIDTH: u32 = 400;
const EMBED_HEIGHT: u32 = 160;

/// Shown with every "no category" warning.
const GENRE_HINT: &str = "Try: chill, rock, latin, pop, country, holiday...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

impl StatusLevel {
    fn tag(self) -> &'static str {
        match self {
            Self::Info => "[info]",
            Self::Warning => "[warn]",
            Self::Error => "[error]",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    fn new(level: StatusLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    /// The line describing which song was picked and why.
    #[must_use]
    pub fn for_pick(pick: &Pick) -> Self {
        let song = &pick.song;
        let text = match &pick.origin {
            PickOrigin::Trending => format!("🔥 Trending: {} by {}", song.title, song.artist),
            PickOrigin::Cluster(label) => {
                format!("🎶 From {label}: {} by {}", song.title, song.artist)
            }
            PickOrigin::Matched { label, .. } => {
                format!("🎶 Matched {label}: {} by {}", song.title, song.artist)
            }
        };
        Self::new(StatusLevel::Info, text)
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.level.tag(), self.text)
    }
}

/// URL-shaped reference to an embeddable player for one track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedReference {
    track: TrackId,
}

impl EmbedReference {
    #[must_use]
    pub fn new(track: TrackId) -> Self {
        Self { track }
    }

    #[must_use]
    pub fn url(&self) -> String {
        format!("{EMBED_BASE_URL}/{}", self.track.as_str())
    }

    /// `<iframe>` snippet sized like the player widget.
    #[must_use]
    pub fn iframe_html(&self) -> String {
        format!(
            r#"<iframe src="{}" width="{EMBED_WIDTH}" height="{EMBED_HEIGHT}" frameborder="0" allow="encrypted-media"></iframe>"#,
            self.url()
        )
    }
}

/// Everything shown for one interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub messages: Vec<StatusMessage>,
    pub embed: Option<EmbedReference>,
}

impl Outcome {
    #[must_use]
    pub fn from_result(result: &Result<Recommendation, RecommendError>) -> Self {
        match result {
            Ok(recommendation) => Self {
                messages: vec![StatusMessage::for_pick(&recommendation.pick)],
                embed: Some(EmbedReference::new(recommendation.track.clone())),
            },
            Err(err) => {
                let mut messages: Vec<StatusMessage> =
                    err.pick().map(StatusMessage::for_pick).into_iter().collect();
                messages.push(match err {
                    RecommendError::NoCategoryMatch { genre } => StatusMessage::new(
                        StatusLevel::Warning,
                        format!("No category matched '{genre}'. {GENRE_HINT}"),
                    ),
                    RecommendError::NoTrackFound { .. } => StatusMessage::new(
                        StatusLevel::Warning,
                        "Could not find this song on Spotify.",
                    ),
                    RecommendError::Unexpected { .. } => {
                        StatusMessage::new(StatusLevel::Error, format!("Error: {err}"))
                    }
                });
                Self {
                    messages,
                    embed: None,
                }
            }
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.messages
            .iter()
            .any(|message| message.level == StatusLevel::Error)
    }
}

/// How an outcome is written out.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Also print the `<iframe>` snippet.
    pub html: bool,
}

/// Write an outcome as plain text lines.
///
/// # Errors
///
/// Propagates write failures.
pub fn render<W: Write>(out: &mut W, outcome: &Outcome, options: RenderOptions) -> io::Result<()> {
    for message in &outcome.messages {
        writeln!(out, "{message}")?;
    }
    if let Some(embed) = &outcome.embed {
        writeln!(out, "▶ {}", embed.url())?;
        if options.html {
            writeln!(out, "{}", embed.iframe_html())?;
        }
    }
    Ok(())
}

/// Numbered category list as shown to the user.
///
/// # Errors
///
/// Propagates write failures.
pub fn render_categories<W: Write>(out: &mut W, categories: &[String]) -> io::Result<()> {
    for (index, category) in categories.iter().enumerate() {
        writeln!(out, "{:>3}. {category}", index + 1)?;
    }
    Ok(())
}
