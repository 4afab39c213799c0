// Tutorials and per-user progress through them

use axum::{
    extract::{Path, State},
    Extension,
};
use uuid::Uuid;

use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::models::{ProgressRequest, Tutorial, TutorialProgress, TutorialRequest};
use crate::state::AppState;

use super::utils::parse_id;

/// GET /tutorials
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Tutorial>> {
    let tutorials = state.repo::<Tutorial>().select_all().await?;
    Ok(ApiResponse::success(tutorials))
}

/// GET /tutorials/user/:userId - Tutorials written by one author
pub async fn list_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Vec<Tutorial>> {
    let user_id = parse_id(&user_id, "user")?;
    let tutorials = state
        .repo::<Tutorial>()
        .select_by("author", &user_id.to_string())
        .await?;
    Ok(ApiResponse::success(tutorials))
}

/// GET /tutorials/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Tutorial> {
    let id = parse_id(&id, "tutorial")?;
    let tutorial = state.repo::<Tutorial>().select_404(id).await?;
    Ok(ApiResponse::success(tutorial))
}

/**
 * POST /tutorials - Create a tutorial authored by the caller
 *
 * Required: title, description, steps (non-empty), materials (non-empty),
 * craftType (one of the display names such as "Paper Craft"). A `userId` in
 * the body is accepted only when it names the caller.
 */
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<TutorialRequest>,
) -> ApiResult<Tutorial> {
    let draft = body.validate()?;
    if let Some(claimed) = draft.user_id {
        user.ensure_owner(claimed, "create tutorials as yourself")?;
    }

    let tutorial = Tutorial::new(user.user_id, draft);
    state.repo::<Tutorial>().insert(&tutorial).await?;

    tracing::info!("User {} published tutorial {}", user.user_id, tutorial.id);
    Ok(ApiResponse::created(tutorial))
}

/// PUT /tutorials/:id - Validate, then 404, then author check, then overwrite
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<TutorialRequest>,
) -> ApiResult<Tutorial> {
    let id = parse_id(&id, "tutorial")?;
    let draft = body.validate()?;

    let repo = state.repo::<Tutorial>();
    let mut tutorial = repo.select_404(id).await?;
    user.ensure_owner(tutorial.author, "update your own tutorials")?;

    tutorial.apply(draft);
    repo.update(&tutorial).await?;
    Ok(ApiResponse::success(tutorial))
}

/// DELETE /tutorials/:id - Author only. Progress records go with it.
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id, "tutorial")?;
    let repo = state.repo::<Tutorial>();
    let tutorial = repo.select_404(id).await?;
    user.ensure_owner(tutorial.author, "delete your own tutorials")?;

    repo.delete(id).await?;

    let progress = state.repo::<TutorialProgress>();
    for record in progress.select_by("tutorialId", &id.to_string()).await? {
        progress.delete(record.id).await?;
    }

    tracing::info!("User {} deleted tutorial {}", user.user_id, id);
    Ok(ApiResponse::no_content())
}

async fn find_progress(
    state: &AppState,
    user_id: Uuid,
    tutorial_id: Uuid,
) -> Result<Option<TutorialProgress>, ApiError> {
    let key = TutorialProgress::key(user_id, tutorial_id);
    Ok(state.repo::<TutorialProgress>().select_one(key).await?)
}

/// GET /tutorials/:id/progress - The caller's progress; empty when none yet
pub async fn get_progress(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<TutorialProgress> {
    let id = parse_id(&id, "tutorial")?;
    state.repo::<Tutorial>().select_404(id).await?;

    let progress = find_progress(&state, user.user_id, id)
        .await?
        .unwrap_or_else(|| TutorialProgress::empty(user.user_id, id));
    Ok(ApiResponse::success(progress))
}

/// POST /tutorials/:id/progress - `{completedSteps}` replaces the caller's
/// completed set
pub async fn record_progress(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<ProgressRequest>,
) -> ApiResult<TutorialProgress> {
    let id = parse_id(&id, "tutorial")?;
    let steps = body
        .completed_steps
        .ok_or_else(|| ApiError::bad_request("completedSteps is required"))?;

    let tutorial = state.repo::<Tutorial>().select_404(id).await?;
    let repo = state.repo::<TutorialProgress>();

    let mut progress = find_progress(&state, user.user_id, id)
        .await?
        .unwrap_or_else(|| TutorialProgress::empty(user.user_id, id));
    progress.record(&steps, tutorial.steps.len())?;

    match repo.update(&progress).await {
        Ok(()) => {}
        // First record for this pair. A concurrent first write lands on the
        // same id, so the loser overwrites instead of adding a second record.
        Err(DatabaseError::NotFound(_)) => match repo.insert(&progress).await {
            Err(DatabaseError::Duplicate(_)) => repo.update(&progress).await?,
            other => other?,
        },
        Err(e) => return Err(e.into()),
    }
    Ok(ApiResponse::success(progress))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::models::CraftType;
    use crate::models::tutorial::TutorialDraft;

    async fn seeded() -> (AppState, AuthUser, Uuid) {
        let state = AppState::new(AppConfig::for_tests());
        let author = Uuid::new_v4();
        let tutorial = Tutorial::new(
            author,
            TutorialDraft {
                title: "Pinch pot".into(),
                description: "A first pot".into(),
                craft_type: CraftType::Pottery,
                steps: vec!["Roll".into(), "Pinch".into()],
                materials: vec!["Clay".into()],
                images: None,
                videos: None,
                user_id: None,
            },
        );
        state.repo::<Tutorial>().insert(&tutorial).await.unwrap();

        let learner = AuthUser { user_id: Uuid::new_v4(), username: "theo".into() };
        (state, learner, tutorial.id)
    }

    fn steps(completed: &[usize]) -> ApiJson<ProgressRequest> {
        ApiJson(ProgressRequest { completed_steps: Some(completed.to_vec()) })
    }

    #[tokio::test]
    async fn concurrent_first_writes_keep_one_record() {
        let (state, learner, tutorial_id) = seeded().await;

        let (a, b) = tokio::join!(
            record_progress(
                State(state.clone()),
                Extension(learner.clone()),
                Path(tutorial_id.to_string()),
                steps(&[0]),
            ),
            record_progress(
                State(state.clone()),
                Extension(learner.clone()),
                Path(tutorial_id.to_string()),
                steps(&[0, 1]),
            ),
        );
        assert!(a.is_ok());
        assert!(b.is_ok());

        let records = state
            .repo::<TutorialProgress>()
            .select_by("tutorialId", &tutorial_id.to_string())
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, TutorialProgress::key(learner.user_id, tutorial_id));
    }

    #[tokio::test]
    async fn later_write_replaces_completed_steps() {
        let (state, learner, tutorial_id) = seeded().await;

        for completed in [&[0, 1][..], &[1][..]] {
            record_progress(
                State(state.clone()),
                Extension(learner.clone()),
                Path(tutorial_id.to_string()),
                steps(completed),
            )
            .await
            .unwrap();
        }

        let progress = find_progress(&state, learner.user_id, tutorial_id).await.unwrap().unwrap();
        assert_eq!(progress.completed_steps, vec![1]);
        assert!(!progress.is_completed);
    }
}
