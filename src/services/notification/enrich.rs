//! Enrichment step: joins an enquiry to its related user record and
//! resolves contact details into one canonical shape.
//!
//! Contact fields can live directly on the enquiry row or on the linked
//! user, depending on which intake flow wrote the record. Resolution
//! happens exactly once, here; the formatter never sees the dual paths.

use uuid::Uuid;

use crate::models::{Enquiry, User};

use super::store::EnquiryStore;

/// Enrichment failures that stop the pipeline
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    #[error("Enquiry {0} not found")]
    NotFound(Uuid),

    #[error("Store error while enriching enquiry {0}: {1}")]
    Store(Uuid, String),
}

/// Contact details resolved from the enquiry row and its linked user.
/// Top-level enquiry fields win; the embedded user is the fallback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contact {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// An enquiry joined with its optional user, built fresh per
/// notification and discarded when the orchestrator returns.
#[derive(Debug, Clone)]
pub struct EnrichedEnquiry {
    pub enquiry: Enquiry,
    pub user: Option<User>,
    pub contact: Contact,
}

impl EnrichedEnquiry {
    fn new(enquiry: Enquiry, user: Option<User>) -> Self {
        let contact = resolve_contact(&enquiry, user.as_ref());
        Self {
            enquiry,
            user,
            contact,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.trim().is_empty()).map(str::to_string)
}

fn resolve_contact(enquiry: &Enquiry, user: Option<&User>) -> Contact {
    Contact {
        first_name: non_empty(&enquiry.first_name)
            .or_else(|| user.map(|u| u.first_name.clone()).filter(|v| !v.is_empty())),
        last_name: non_empty(&enquiry.last_name)
            .or_else(|| user.map(|u| u.last_name.clone()).filter(|v| !v.is_empty())),
        email: non_empty(&enquiry.email)
            .or_else(|| user.map(|u| u.email.clone()).filter(|v| !v.is_empty())),
        phone: non_empty(&enquiry.phone).or_else(|| user.and_then(|u| non_empty(&u.phone))),
    }
}

/// Fetches an enquiry and its related user, merging both into an
/// [`EnrichedEnquiry`].
///
/// A missing or failed user lookup degrades to `user = None` rather than
/// failing the whole enrichment; only a missing enquiry (or a store
/// error on the enquiry fetch itself) is terminal.
pub async fn enrich(
    store: &dyn EnquiryStore,
    enquiry_id: Uuid,
) -> Result<EnrichedEnquiry, EnrichError> {
    let enquiry = store
        .get_enquiry(enquiry_id)
        .await
        .map_err(|e| EnrichError::Store(enquiry_id, e.to_string()))?
        .ok_or(EnrichError::NotFound(enquiry_id))?;

    let user = match enquiry.user_id {
        Some(user_id) => match store.get_user(user_id).await {
            Ok(Some(user)) => Some(user),
            Ok(None) => {
                log::warn!(
                    "Enquiry {} references missing user {}, continuing without user data",
                    enquiry_id,
                    user_id
                );
                None
            }
            Err(e) => {
                log::warn!(
                    "User lookup failed for enquiry {} (user {}): {}, continuing without user data",
                    enquiry_id,
                    user_id,
                    e
                );
                None
            }
        },
        None => None,
    };

    Ok(EnrichedEnquiry::new(enquiry, user))
}
