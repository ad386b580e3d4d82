//! # Validation Module
//!
//! Input validation rules, applied before any storage access.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (apps/api)                                       │
//! │  ├── JSON shape (malformed body → 400)                                  │
//! │  └── Required fields present                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Quantities positive, ratings 1..=5, prices within 0..=MAX_PRICE    │
//! │  └── Names and emails well-formed                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── CHECK (stock >= 0), CHECK (rating BETWEEN 1 AND 5)                 │
//! │  ├── UNIQUE (email)                                                     │
//! │  └── Foreign key constraints                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use confeitaria_core::validation::{validate_quantity, validate_rating};
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_rating(6).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{ItemRequest, NewClient, NewFeedback, NewProduct};
use crate::{MAX_ITEM_QUANTITY, MAX_ORDER_ITEMS, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_EMAIL_LEN: usize = 254;
const MAX_COMMENT_LEN: usize = 2000;
const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (user, client or product).
///
/// ## Rules
/// - Must not be blank
/// - At most 200 characters
///
/// Returns the trimmed name.
pub fn validate_name(field: &str, name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required(field));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates an email address.
///
/// Only the shape is checked: one `@` with a non-empty local part and a
/// dotted domain. Returns the trimmed, lowercased address.
///
/// ## Example
/// ```rust
/// use confeitaria_core::validation::validate_email;
///
/// assert_eq!(validate_email(" Ana@Example.com ").unwrap(), "ana@example.com");
/// assert!(validate_email("ana.example.com").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }

    if email.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LEN,
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@domain.tld".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(invalid());
    }

    Ok(email.to_lowercase())
}

/// Validates a signup password.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::InvalidFormat {
            field: "password".to_string(),
            reason: format!("must be at least {MIN_PASSWORD_LEN} characters"),
        });
    }

    Ok(())
}

/// Validates a plan label.
pub fn validate_plan(plan: &str) -> ValidationResult<String> {
    validate_name("plan", plan)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line-item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
///
/// ## User Workflow
/// ```text
/// POST /api/orders/single { quantity: 0 }
///      │
///      ▼
/// validate_quantity(0) ← THIS FUNCTION
///      │
///      ├── qty <= 0? → 400 "quantity must be positive"
///      │
///      └── OK → open the order transaction
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed, above MAX_PRICE_CENTS is not.
///
/// ## Example
/// ```rust
/// use confeitaria_core::validation::validate_price_cents;
/// use confeitaria_core::MAX_PRICE_CENTS;
///
/// assert!(validate_price_cents(1099).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// assert!(validate_price_cents(MAX_PRICE_CENTS + 1).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "price_cents".to_string(),
        });
    }

    if cents > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "price_cents".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates an absolute stock level set by product CRUD.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

/// Validates a feedback rating.
pub fn validate_rating(rating: i64) -> ValidationResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: 1,
            max: 5,
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates the line items of a multi-item order.
///
/// ## Rules
/// - At least one item, at most MAX_ORDER_ITEMS
/// - Every quantity passes [`validate_quantity`]
///
/// Duplicate product ids are allowed; each line reserves separately.
pub fn validate_order_items(items: &[ItemRequest]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::required("items"));
    }

    if items.len() > MAX_ORDER_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_ORDER_ITEMS as i64,
        });
    }

    items
        .iter()
        .try_for_each(|item| validate_quantity(item.quantity))
}

/// Normalises and validates a client before insert or update.
pub fn validate_new_client(client: NewClient) -> ValidationResult<NewClient> {
    Ok(NewClient {
        name: validate_name("name", &client.name)?,
        email: validate_email(&client.email)?,
        status: client.status,
    })
}

/// Normalises and validates a product before insert or update.
pub fn validate_new_product(product: NewProduct) -> ValidationResult<NewProduct> {
    let name = validate_name("name", &product.name)?;
    validate_price_cents(product.price_cents)?;
    validate_stock(product.stock)?;

    Ok(NewProduct { name, ..product })
}

/// Normalises and validates a feedback before insert.
pub fn validate_new_feedback(feedback: NewFeedback) -> ValidationResult<NewFeedback> {
    validate_rating(feedback.rating)?;

    let comment = feedback.comment.trim().to_string();
    if comment.chars().count() > MAX_COMMENT_LEN {
        return Err(ValidationError::TooLong {
            field: "comment".to_string(),
            max: MAX_COMMENT_LEN,
        });
    }

    let photo = feedback
        .photo
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());

    Ok(NewFeedback {
        comment,
        photo,
        ..feedback
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
