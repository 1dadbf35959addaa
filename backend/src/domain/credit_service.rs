use log::{info, warn};
use shared::{ApiMessage, CreateCreditoRequest, Credito};
use std::sync::Arc;

use crate::domain::commands::credits::CreateCreditCommand;
use crate::domain::error::ServiceError;
use crate::domain::models::record::parse_calendar_date;
use crate::domain::models::{AuthToken, Session};
use crate::domain::session::SessionContext;
use crate::storage::CreditStorage;

/// Service for the credit ledger.
///
/// Members see their own credits; staff see and manage everyone's. Bookings
/// consume the user's oldest credit, which is the first one the API lists.
#[derive(Clone)]
pub struct CreditService {
    session: SessionContext,
    credits: Arc<dyn CreditStorage>,
}

impl CreditService {
    pub fn new(session: SessionContext, credits: Arc<dyn CreditStorage>) -> Self {
        Self { session, credits }
    }

    pub async fn list_credits(&self, user_id: &str) -> Result<Vec<Credito>, ServiceError> {
        let session = self.session_for(user_id, "view another member's credits")?;
        let credits = self.session.guard(self.credits.list_credits(&session.token, user_id).await)?;
        info!("User {} has {} credits", user_id, credits.len());
        Ok(credits)
    }

    pub async fn create_credit(&self, command: CreateCreditCommand) -> Result<ApiMessage, ServiceError> {
        let session = self.session.require_staff("create credits")?;

        let user_id = command.user_id.trim();
        if user_id.is_empty() {
            return Err(ServiceError::Validation("A user is required".to_string()));
        }
        let expires_on = command.expires_on.trim();
        if parse_calendar_date(expires_on).is_none() {
            return Err(ServiceError::Validation(format!(
                "Invalid expiry date '{}', expected YYYY-MM-DD",
                expires_on
            )));
        }

        let request = CreateCreditoRequest {
            usuario: user_id.to_string(),
            vence_en: expires_on.to_string(),
        };
        let message = self.session.guard(self.credits.create_credit(&session.token, &request).await)?;
        info!("Created credit for user {} expiring {}", user_id, expires_on);
        Ok(message)
    }

    pub async fn delete_credit(&self, credit_id: &str) -> Result<ApiMessage, ServiceError> {
        let session = self.session.require_staff("delete credits")?;
        if credit_id.trim().is_empty() {
            return Err(ServiceError::Validation("Credit id is required".to_string()));
        }
        self.session
            .guard(self.credits.delete_credit(&session.token, credit_id).await)
            .map_err(|e| e.or_not_found(|| format!("Credit {}", credit_id)))
    }

    pub(crate) async fn count_credits(&self, token: &AuthToken, user_id: &str) -> Result<usize, ServiceError> {
        let credits = self.session.guard(self.credits.list_credits(token, user_id).await)?;
        Ok(credits.len())
    }

    /// Delete the user's oldest credit after a successful booking.
    ///
    /// Never fails: the booking already happened, so problems are logged and
    /// reported as `false`.
    pub(crate) async fn consume_oldest(&self, token: &AuthToken, user_id: &str) -> bool {
        let credits = match self.session.guard(self.credits.list_credits(token, user_id).await) {
            Ok(credits) => credits,
            Err(e) => {
                warn!("Booking for {} kept without consuming a credit: {}", user_id, e);
                return false;
            }
        };

        let Some(oldest) = credits.first() else {
            warn!("User {} booked a slot with no credits left", user_id);
            return false;
        };

        match self.session.guard(self.credits.delete_credit(token, &oldest.id).await) {
            Ok(_) => {
                info!("Consumed credit {} of user {}", oldest.id, user_id);
                true
            }
            Err(e) => {
                warn!("Failed to consume credit {} of user {}: {}", oldest.id, user_id, e);
                false
            }
        }
    }

    /// Spend the session user's own oldest credit after they booked a slot.
    ///
    /// Same contract as [`Self::consume_oldest`], through the self-service
    /// endpoint so students need no rights over the credit ledger.
    pub(crate) async fn consume_own_oldest(&self, token: &AuthToken, user_id: &str) -> bool {
        match self.session.guard(self.credits.consume_own_oldest(token).await) {
            Ok(_) => {
                info!("Consumed oldest credit of user {}", user_id);
                true
            }
            Err(e) => {
                warn!("Booking for {} kept without consuming a credit: {}", user_id, e);
                false
            }
        }
    }

    /// Staff may act on anyone; members only on themselves
    fn session_for(&self, user_id: &str, action: &'static str) -> Result<Session, ServiceError> {
        let session = self.session.require()?;
        if session.user.id != user_id && !session.user.role.is_staff() {
            return Err(ServiceError::Forbidden {
                role: session.user.role,
                action,
            });
        }
        Ok(session)
    }
}
