use anyhow::anyhow;
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use atrium_core::{AppError, CursorPage, clamp_limit};
use atrium_models::purchases::DEFAULT_PURCHASE_LIMIT;
use atrium_models::{
    CreatePurchaseDto, ListPurchasesQuery, MessageResponse, Purchase, PurchaseKey, PurchaseList,
    PurchaseStatus, RefreshPurchasesDto, RefreshPurchasesResponse, UserRole,
};
use atrium_observability::track_purchase_recorded;

use crate::middleware::auth::{require_role, require_session};
use crate::modules::courses::service::CourseService;
use crate::state::AppState;

pub struct PurchaseService;

impl PurchaseService {
    /// Clients only. A reservation may later be upgraded to an enrollment;
    /// reserving twice or buying an enrolled course again is a conflict.
    #[instrument(skip(state, token, dto), fields(tenant.id = %dto.tenant_id, course.id = %dto.course_id))]
    pub async fn create_purchase(
        state: &AppState,
        token: Option<&str>,
        dto: CreatePurchaseDto,
    ) -> Result<Purchase, AppError> {
        let claim = require_role(state, token, &dto.tenant_id, &[UserRole::Client]).await?;

        let course = state
            .courses
            .get(&claim.tenant_id, &dto.course_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Course '{}' not found", dto.course_id)))?;
        let schedule = state
            .schedules
            .get(&claim.tenant_id, &dto.course_id, &dto.schedule_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(anyhow!("Schedule '{}' not found", dto.schedule_id))
            })?;

        let existing = state
            .purchases
            .get(&claim.tenant_id, &dto.course_id, &claim.dni)
            .await?;
        match (existing.as_ref().map(|p| p.status), dto.status) {
            (Some(PurchaseStatus::Enrolled), _) => {
                return Err(AppError::conflict(anyhow!("Already enrolled in this course")));
            }
            (Some(PurchaseStatus::Reserved), PurchaseStatus::Reserved) => {
                return Err(AppError::conflict(anyhow!("Course already reserved")));
            }
            _ => {}
        }

        let now = Utc::now();
        let mut purchase = Purchase::new(
            claim.dni,
            claim.full_name,
            dto.status,
            &course,
            &schedule,
            now,
        );

        if let Some(reservation) = existing {
            // An upgrade keeps the reservation's purchase time.
            purchase.purchased_at = reservation.purchased_at;
            purchase.updated_at = Some(now);
            state.purchases.replace(&purchase).await?;
        } else if !state.purchases.insert(&purchase).await? {
            return Err(AppError::conflict(anyhow!("Course already reserved")));
        }

        track_purchase_recorded(purchase.status.as_str());
        info!(purchase.status = purchase.status.as_str(), "Purchase recorded");
        Ok(purchase)
    }

    /// Clients see their own purchases, paged by `course_id`. Admins and the
    /// course instructor see the purchases of one course, paged by `dni`.
    #[instrument(skip(state, token), fields(tenant.id = %query.tenant_id))]
    pub async fn list_purchases(
        state: &AppState,
        token: Option<&str>,
        query: ListPurchasesQuery,
    ) -> Result<PurchaseList, AppError> {
        let claim = require_session(state, token, &query.tenant_id).await?;
        let limit = clamp_limit(query.limit, DEFAULT_PURCHASE_LIMIT);

        let page = if claim.role == UserRole::Client {
            let purchases = state
                .purchases
                .list_for_client(
                    &claim.tenant_id,
                    &claim.dni,
                    query.status,
                    query.last_key.as_deref(),
                    limit + 1,
                )
                .await?;
            CursorPage::from_overfetch(purchases, limit, |p| p.course_id.to_string())
        } else {
            let course_id = query
                .course_id
                .ok_or_else(|| AppError::bad_request(anyhow!("course_id is required")))?;
            CourseService::owned_course(state, &claim, &course_id).await?;
            let purchases = state
                .purchases
                .list_for_course(
                    &claim.tenant_id,
                    &course_id,
                    None,
                    query.status,
                    query.last_key.as_deref(),
                    Some(limit + 1),
                )
                .await?;
            CursorPage::from_overfetch(purchases, limit, |p| p.dni.clone())
        };
        debug!(count = page.items.len(), has_more = page.next.is_some(), "Listed purchases");

        Ok(PurchaseList {
            count: page.items.len(),
            purchases: page.items,
            last_key: page.next,
        })
    }

    /// Copies the current course (and, when named, one schedule) into every
    /// purchase that references it. Admin or the course instructor.
    #[instrument(skip(state, token, dto), fields(tenant.id = %dto.tenant_id, course.id = %dto.course_id))]
    pub async fn refresh_purchases(
        state: &AppState,
        token: Option<&str>,
        dto: RefreshPurchasesDto,
    ) -> Result<RefreshPurchasesResponse, AppError> {
        let claim = require_session(state, token, &dto.tenant_id).await?;
        let course = CourseService::owned_course(state, &claim, &dto.course_id).await?;

        let schedule = match &dto.schedule_id {
            Some(schedule_id) => Some(
                state
                    .schedules
                    .get(&claim.tenant_id, &dto.course_id, schedule_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::not_found(anyhow!("Schedule '{}' not found", schedule_id))
                    })?,
            ),
            None => None,
        };

        let purchases = state
            .purchases
            .list_for_course(
                &claim.tenant_id,
                &dto.course_id,
                dto.schedule_id.as_ref(),
                None,
                None,
                None,
            )
            .await?;
        if purchases.is_empty() {
            return Err(AppError::not_found(anyhow!("No purchases to update")));
        }

        let now = Utc::now();
        let updated = purchases.len();
        for mut purchase in purchases {
            purchase.apply_course(&course);
            if let Some(schedule) = &schedule {
                purchase.apply_schedule(schedule);
            }
            purchase.updated_at = Some(now);
            state.purchases.replace(&purchase).await?;
        }

        info!(updated, "Purchases refreshed");
        Ok(RefreshPurchasesResponse {
            message: format!("{} purchases updated", updated),
            updated,
        })
    }

    /// Clients cancel their own reservation or enrollment.
    #[instrument(skip(state, token), fields(tenant.id = %key.tenant_id, course.id = %key.course_id))]
    pub async fn delete_purchase(
        state: &AppState,
        token: Option<&str>,
        key: PurchaseKey,
    ) -> Result<MessageResponse, AppError> {
        let claim = require_role(state, token, &key.tenant_id, &[UserRole::Client]).await?;

        let purchase = state
            .purchases
            .get(&claim.tenant_id, &key.course_id, &claim.dni)
            .await?
            .ok_or_else(|| {
                warn!("Cancellation without a purchase");
                AppError::not_found(anyhow!("No purchase found for this course"))
            })?;

        if !state
            .purchases
            .delete(&claim.tenant_id, &key.course_id, &claim.dni)
            .await?
        {
            return Err(AppError::not_found(anyhow!("No purchase found for this course")));
        }

        info!(purchase.status = purchase.status.as_str(), "Purchase cancelled");
        Ok(MessageResponse::new(match purchase.status {
            PurchaseStatus::Enrolled => "Enrollment cancelled",
            PurchaseStatus::Reserved => "Reservation cancelled",
        }))
    }
}
