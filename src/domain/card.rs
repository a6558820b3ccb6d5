//! Card data model.
//!
//! `CardData` is a value object: every edit produces a new card rather than
//! mutating fields in place, so any snapshot handed to an export stays stable.

use serde::{Deserialize, Serialize};

use super::error::{AppError, Result};

/// Editable contact and company fields of a business card.
///
/// No field is optional; an empty string means "absent".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CardData {
    /// Person's full name.
    pub name: String,
    /// Job title.
    pub title: String,
    /// Phone number, free-form.
    pub phone: String,
    /// Email address, free-form.
    pub email: String,
    /// Company name.
    pub company: String,
    /// Company tagline shown on the front face.
    pub tagline: String,
    /// Website, with or without scheme.
    pub website: String,
    /// Postal address; may span several lines.
    pub address: String,
    /// Short company description.
    pub description: String,
}

impl CardData {
    /// The card a new editing session starts with.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            name: "Frianti".into(),
            title: "Sales Manager".into(),
            phone: "+62 812-6695-1503".into(),
            email: "sales@joseraglobalitsolusindo.com".into(),
            company: "PT Josera Global Solusindo".into(),
            tagline: "“Empowering Growth, Nurturing Future”".into(),
            website: "www.joseraglobalitsolusindo.com".into(),
            address: "Grand Galaxy City, RGA 53, Bekasi".into(),
            description: "Providing comprehensive IT solutions and services.".into(),
        }
    }

    /// Read a single field.
    #[must_use]
    pub fn get(&self, field: CardField) -> &str {
        match field {
            CardField::Name => &self.name,
            CardField::Title => &self.title,
            CardField::Phone => &self.phone,
            CardField::Email => &self.email,
            CardField::Company => &self.company,
            CardField::Tagline => &self.tagline,
            CardField::Website => &self.website,
            CardField::Address => &self.address,
            CardField::Description => &self.description,
        }
    }

    /// Return a new card with one field replaced.
    #[must_use]
    pub fn with_field(&self, field: CardField, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        let slot = match field {
            CardField::Name => &mut next.name,
            CardField::Title => &mut next.title,
            CardField::Phone => &mut next.phone,
            CardField::Email => &mut next.email,
            CardField::Company => &mut next.company,
            CardField::Tagline => &mut next.tagline,
            CardField::Website => &mut next.website,
            CardField::Address => &mut next.address,
            CardField::Description => &mut next.description,
        };
        *slot = value.into();
        next
    }
}

/// Names of the editable card fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardField {
    Name,
    Title,
    Phone,
    Email,
    Company,
    Tagline,
    Website,
    Address,
    Description,
}

impl CardField {
    /// All fields in display order.
    pub const ALL: [Self; 9] = [
        Self::Name,
        Self::Title,
        Self::Phone,
        Self::Email,
        Self::Company,
        Self::Tagline,
        Self::Website,
        Self::Address,
        Self::Description,
    ];

    /// Machine name used on the command line.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Title => "title",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Company => "company",
            Self::Tagline => "tagline",
            Self::Website => "website",
            Self::Address => "address",
            Self::Description => "description",
        }
    }

    /// Human label used in tables.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Full Name",
            Self::Title => "Job Title",
            Self::Phone => "Phone Number",
            Self::Email => "Email Address",
            Self::Company => "Company Name",
            Self::Tagline => "Tagline",
            Self::Website => "Website",
            Self::Address => "Address",
            Self::Description => "Short Description",
        }
    }
}

impl std::str::FromStr for CardField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.key() == wanted)
            .ok_or_else(|| AppError::InvalidField { name: s.to_string() })
    }
}

impl std::fmt::Display for CardField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
