use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::domain::product::{Product, ProductDraft};
use crate::services::inventory::ConfirmDelete;

/// Image used when the form is submitted without one.
pub const DEFAULT_IMAGE_URL: &str = "https://i.imgur.com/1sk8cj2.png";

const PRICE_REQUIRED: &str = "Price is required";
const CATEGORY_REQUIRED: &str = "Category is required";

/// Field name to error message. Empty means the form is valid.
pub type FormErrors = BTreeMap<String, String>;

/// Form payload emitted by the create and edit product dialogs.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProductForm {
    #[validate(length(min = 1, message = "Title is required"))]
    #[serde(default)]
    pub title: String,
    #[validate(
        required(message = "Price is required"),
        range(exclusive_min = 0.0, message = "Price must be greater than 0")
    )]
    #[serde(default)]
    pub price: Option<f64>,
    #[validate(length(min = 1, message = "Description is required"))]
    #[serde(default)]
    pub description: String,
    /// `None` while no category is selected.
    #[validate(required(message = "Category is required"))]
    #[serde(default)]
    pub category_id: Option<i32>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Outcome of running validation over a submitted form.
#[derive(Debug, Clone)]
pub struct FormValidation {
    /// Sanitized form, with the default image applied when needed.
    pub form: ProductForm,
    pub errors: FormErrors,
    /// Set when no image was supplied and [`DEFAULT_IMAGE_URL`] was used.
    pub default_image_applied: bool,
}

impl FormValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Convert a valid form into the payload sent to the catalog.
    pub fn into_draft(self) -> Result<ProductDraft, FormErrors> {
        let FormValidation {
            form, mut errors, ..
        } = self;

        let ProductForm {
            title,
            price,
            description,
            category_id,
            images,
        } = form;

        match (price, category_id) {
            (Some(price), Some(category_id)) if errors.is_empty() => Ok(ProductDraft {
                title,
                price,
                description,
                category_id,
                images,
            }),
            _ => {
                if price.is_none() {
                    errors
                        .entry("price".to_string())
                        .or_insert_with(|| PRICE_REQUIRED.to_string());
                }
                if category_id.is_none() {
                    errors
                        .entry("category_id".to_string())
                        .or_insert_with(|| CATEGORY_REQUIRED.to_string());
                }
                Err(errors)
            }
        }
    }
}

impl ProductForm {
    /// Sanitize and validate the form.
    ///
    /// A missing image is replaced with [`DEFAULT_IMAGE_URL`] whether or not
    /// the remaining fields are valid.
    pub fn validate_draft(self) -> FormValidation {
        let mut form = self.sanitized();

        let default_image_applied = form.images.is_empty();
        if default_image_applied {
            form.images = vec![DEFAULT_IMAGE_URL.to_string()];
        }

        let errors = match form.validate() {
            Ok(()) => FormErrors::new(),
            Err(errors) => collect_messages(&errors),
        };

        FormValidation {
            form,
            errors,
            default_image_applied,
        }
    }

    fn sanitized(self) -> Self {
        Self {
            title: sanitize_inline_text(&self.title),
            price: self.price,
            description: sanitize_multiline_text(&self.description),
            category_id: self.category_id,
            images: self
                .images
                .iter()
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty())
                .collect(),
        }
    }
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            price: Some(product.price),
            description: product.description.clone(),
            category_id: product.category.as_ref().map(|category| category.id),
            images: product.images.clone(),
        }
    }
}

/// Decision posted from the delete confirmation dialog.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteProductForm {
    #[serde(default)]
    pub confirm: Option<String>,
}

impl ConfirmDelete for DeleteProductForm {
    fn confirm_delete(&self, _product: &Product) -> bool {
        matches!(self.confirm.as_deref(), Some("yes"))
    }
}

fn collect_messages(errors: &ValidationErrors) -> FormErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, field_errors)| {
            field_errors.first().map(|error| {
                let message = error
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                (field.to_string(), message)
            })
        })
        .collect()
}

fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

fn sanitize_multiline_text(input: &str) -> String {
    let lines: Vec<String> = input.lines().map(sanitize_inline_text).collect();

    let first = lines.iter().position(|line| !line.is_empty());
    let last = lines.iter().rposition(|line| !line.is_empty());
    let (Some(first), Some(last)) = (first, last) else {
        return String::new();
    };

    let mut result: Vec<&str> = Vec::with_capacity(last - first + 1);
    let mut previous_empty = false;
    for line in &lines[first..=last] {
        if line.is_empty() {
            if previous_empty {
                continue;
            }
            previous_empty = true;
        } else {
            previous_empty = false;
        }
        result.push(line);
    }

    result.join("\n")
}
