//! Product Listing Validator.
//!
//! Checks a submitted listing field by field and either returns a normalized
//! [`ValidListing`] or every rejection reason keyed by field name. The
//! validator holds only immutable rules, so one instance can serve
//! concurrent requests.

use serde::{Deserialize, Serialize};

use kindaebay_core::{cleaned, ChoiceSet, FieldErrors, REQUIRED_MESSAGE};

use crate::price::Price;
use crate::rules::ListingRules;

/// Field names used as keys in [`FieldErrors`].
pub mod fields {
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const PRICE: &str = "price";
    pub const SUMMARY: &str = "summary";
    pub const CATEGORY: &str = "category";
    pub const LABEL: &str = "label";
    pub const IMAGE: &str = "image";
}

/// A listing as submitted, before any rule has run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub summary: Option<String>,
    pub category: Option<String>,
    pub label: Option<String>,
    /// Reference to the uploaded image (storage path or file name).
    pub image: Option<String>,
}

/// A listing that passed every rule, with text trimmed and price parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidListing {
    pub title: String,
    pub description: Option<String>,
    pub price: Price,
    pub summary: String,
    pub category: String,
    pub label: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ListingValidator {
    rules: ListingRules,
}

impl ListingValidator {
    pub fn new(rules: ListingRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ListingRules {
        &self.rules
    }

    pub fn validate(&self, form: &ListingForm) -> Result<ValidListing, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = self.clean_title(form.title.as_deref(), &mut errors);
        let price = self.clean_price(form.price.as_deref(), &mut errors);
        let summary = required(fields::SUMMARY, form.summary.as_deref(), &mut errors);
        let category = choice(
            fields::CATEGORY,
            form.category.as_deref(),
            &self.rules.categories,
            &mut errors,
        );
        let label = choice(fields::LABEL, form.label.as_deref(), &self.rules.labels, &mut errors);
        let image = self.clean_image(form.image.as_deref(), &mut errors);
        let description = cleaned(form.description.as_deref()).map(str::to_string);

        match (title, price, summary, category, label) {
            (Some(title), Some(price), Some(summary), Some(category), Some(label))
                if errors.is_empty() =>
            {
                Ok(ValidListing {
                    title,
                    description,
                    price,
                    summary,
                    category,
                    label,
                    image,
                })
            }
            _ => {
                tracing::debug!(
                    fields = ?errors.fields().collect::<Vec<_>>(),
                    messages = errors.message_count(),
                    "listing rejected"
                );
                Err(errors)
            }
        }
    }

    fn clean_title(&self, value: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
        let title = required(fields::TITLE, value, errors)?;
        let len = title.chars().count();
        if len > self.rules.title_max_chars {
            errors.add(
                fields::TITLE,
                format!(
                    "Ensure this value has at most {} characters (it has {len}).",
                    self.rules.title_max_chars
                ),
            );
            return None;
        }
        Some(title)
    }

    fn clean_price(&self, value: Option<&str>, errors: &mut FieldErrors) -> Option<Price> {
        let raw = required(fields::PRICE, value, errors)?;
        match Price::parse_bounded(&raw, self.rules.max_digits, self.rules.decimal_places) {
            Ok(price) => Some(price),
            Err(problems) => {
                errors.extend_field(fields::PRICE, problems);
                None
            }
        }
    }

    fn clean_image(&self, value: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
        let image = cleaned(value)?;
        let file_name = image.rsplit(['/', '\\']).next().unwrap_or(image);
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        if !self.rules.image_extensions.iter().any(|allowed| *allowed == extension) {
            errors.add(
                fields::IMAGE,
                format!(
                    "File extension “{extension}” is not allowed. Allowed extensions are: {}.",
                    self.rules.image_extensions.join(", ")
                ),
            );
            return None;
        }
        Some(image.to_string())
    }
}

fn required(field: &str, value: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
    match cleaned(value) {
        Some(v) => Some(v.to_string()),
        None => {
            errors.add(field, REQUIRED_MESSAGE);
            None
        }
    }
}

fn choice(
    field: &str,
    value: Option<&str>,
    choices: &ChoiceSet,
    errors: &mut FieldErrors,
) -> Option<String> {
    let code = required(field, value, errors)?;
    if !choices.contains(&code) {
        errors.add(field, ChoiceSet::invalid_choice_message(&code));
        return None;
    }
    Some(code)
}
