#![forbid(unsafe_code)]

//! Card records and their derived faces.
//!
//! A [`CardRecord`] is immutable once generated. Everything the grid shows
//! (main value, secondary line, footer) is derived from the [`CardKind`]
//! variant by exhaustive match, so adding a kind is a compiler-checked change.

use std::fmt;

/// Stable identity of a card for its whole lifetime.
///
/// Ids are positive and unique within a [`CardStore`](crate::store::CardStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(pub u32);

impl CardId {
    /// Zero-padded serial shown on the card face, e.g. `0007`.
    #[must_use]
    pub fn serial(self) -> String {
        format!("{:04}", self.0)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Day and month a card was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueDate {
    /// Day of month, 1-based.
    pub day: u8,
    /// Month, 1-based.
    pub month: u8,
}

const MONTHS: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

impl fmt::Display for IssueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let month = usize::from(self.month)
            .checked_sub(1)
            .and_then(|i| MONTHS.get(i))
            .copied()
            .unwrap_or("?");
        write!(f, "{:02} {month}", self.day)
    }
}

/// What kind of pass a card is, with the fields only that kind has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardKind {
    /// Metro/bus pass.
    Transit { zone: String, line: String },
    /// Train ticket.
    Rail { seat: String },
    /// Boarding pass.
    Flight { flight: String },
    /// Store loyalty card.
    Loyalty { points: u32 },
}

impl CardKind {
    /// Category pill text.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Transit { .. } => "Transport",
            Self::Rail { .. } => "Train",
            Self::Flight { .. } => "Vol",
            Self::Loyalty { .. } => "Fidélité",
        }
    }

    /// Short machine name, used by renderers to pick a palette.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Transit { .. } => "transit",
            Self::Rail { .. } => "rail",
            Self::Flight { .. } => "flight",
            Self::Loyalty { .. } => "loyalty",
        }
    }
}

/// One card in the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRecord {
    pub id: CardId,
    pub holder: String,
    pub title: String,
    pub subtitle: String,
    pub issued: IssueDate,
    pub kind: CardKind,
}

impl CardRecord {
    /// Lower-cased text the search box matches against.
    #[must_use]
    pub fn searchable_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.title,
            self.subtitle,
            self.holder,
            self.kind.label()
        )
        .to_lowercase()
    }

    /// Derive the text shown on the card.
    #[must_use]
    pub fn face(&self) -> CardFace {
        let main_value = match &self.kind {
            CardKind::Flight { flight } => flight.clone(),
            CardKind::Rail { seat } => seat.clone(),
            CardKind::Transit { zone, .. } => zone.clone(),
            CardKind::Loyalty { points } => format!("{} pts", group_thousands(*points)),
        };
        let secondary = match &self.kind {
            CardKind::Transit { line, .. } => line.clone(),
            CardKind::Rail { .. } => "e-billet nominatif".to_string(),
            CardKind::Flight { .. } => "Boarding pass".to_string(),
            CardKind::Loyalty { .. } => "Statut Gold".to_string(),
        };
        let footer = match &self.kind {
            CardKind::Flight { .. } => "QR • Boarding",
            CardKind::Transit { .. } | CardKind::Rail { .. } | CardKind::Loyalty { .. } => {
                "QR • Contrôle"
            }
        };

        CardFace {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            date: self.issued.to_string(),
            serial: format!("ID • {}", self.id.serial()),
            holder: self.holder.clone(),
            main_value,
            secondary,
            kind_label: self.kind.label(),
            kind_slug: self.kind.slug(),
            footer,
        }
    }
}

/// Display strings for one card, ready to lay into a card-sized box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFace {
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub serial: String,
    pub holder: String,
    pub main_value: String,
    pub secondary: String,
    pub kind_label: &'static str,
    pub kind_slug: &'static str,
    pub footer: &'static str,
}

/// `1234567` → `1 234 567`.
fn group_thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: CardKind) -> CardRecord {
        CardRecord {
            id: CardId(7),
            holder: "Nina Petit".into(),
            title: "Air France".into(),
            subtitle: "CDG → FCO".into(),
            issued: IssueDate { day: 3, month: 8 },
            kind,
        }
    }

    #[test]
    fn serial_is_zero_padded() {
        assert_eq!(CardId(7).serial(), "0007");
        assert_eq!(CardId(12345).serial(), "12345");
    }

    #[test]
    fn issue_date_formats_short_month() {
        assert_eq!(IssueDate { day: 3, month: 8 }.to_string(), "03 août");
        assert_eq!(IssueDate { day: 28, month: 12 }.to_string(), "28 déc.");
        assert_eq!(IssueDate { day: 1, month: 0 }.to_string(), "01 ?");
        assert_eq!(IssueDate { day: 1, month: 13 }.to_string(), "01 ?");
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(7), "7");
        assert_eq!(group_thousands(1007), "1 007");
        assert_eq!(group_thousands(1234567), "1 234 567");
    }

    #[test]
    fn face_per_kind() {
        let flight = record(CardKind::Flight {
            flight: "AF1007".into(),
        })
        .face();
        assert_eq!(flight.main_value, "AF1007");
        assert_eq!(flight.secondary, "Boarding pass");
        assert_eq!(flight.footer, "QR • Boarding");
        assert_eq!(flight.kind_label, "Vol");
        assert_eq!(flight.serial, "ID • 0007");

        let transit = record(CardKind::Transit {
            zone: "Zones 1-5".into(),
            line: "Ligne B".into(),
        })
        .face();
        assert_eq!(transit.main_value, "Zones 1-5");
        assert_eq!(transit.secondary, "Ligne B");
        assert_eq!(transit.footer, "QR • Contrôle");

        let rail = record(CardKind::Rail {
            seat: "Voiture 3, Place 42".into(),
        })
        .face();
        assert_eq!(rail.secondary, "e-billet nominatif");

        let loyalty = record(CardKind::Loyalty { points: 1049 }).face();
        assert_eq!(loyalty.main_value, "1 049 pts");
        assert_eq!(loyalty.secondary, "Statut Gold");
        assert_eq!(loyalty.kind_slug, "loyalty");
    }

    #[test]
    fn searchable_text_covers_display_fields() {
        let text = record(CardKind::Flight {
            flight: "AF1007".into(),
        })
        .searchable_text();
        assert_eq!(text, "air france cdg → fco nina petit vol");
    }
}
