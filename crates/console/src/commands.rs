//! Subcommand handlers, each driving one page controller.

use std::path::Path;

use anyhow::{anyhow, Context};
use learnhub_client::endpoints::admin::VideoFile;
use learnhub_core::types::DbId;
use learnhub_core::upload::validate_video_upload;
use learnhub_query::{Notification, ViewState};
use learnhub_views::pages::analytics::AnalyticsDashboard;
use learnhub_views::pages::collaboration::CollaborationPage;
use learnhub_views::pages::courses::CourseAdminPage;
use learnhub_views::pages::instructor::InstructorPage;
use learnhub_views::pages::lessons::LessonsPage;
use learnhub_views::pages::practice::{JoinPageView, PracticeJoinPage};
use learnhub_views::AppContext;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::cli::Command;
use crate::render;

pub async fn run(ctx: &AppContext, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Join { code, name } => join(ctx, &code, name).await,
        Command::WatchSession { session_id } => watch_session(ctx, &session_id).await,
        Command::WatchAnalytics => watch_analytics(ctx).await,
        Command::Courses => courses(ctx).await,
        Command::UploadVideo {
            course,
            title,
            order,
            file,
        } => upload_video(ctx, course, &title, order, &file).await,
        Command::Invite { course, emails } => invite(ctx, course, &emails).await,
        Command::SignOut => {
            ctx.sign_out().await?;
            println!("Signed out.");
            Ok(())
        }
    }
}

async fn join(ctx: &AppContext, code: &str, name: Option<String>) -> anyhow::Result<()> {
    let page = PracticeJoinPage::new(ctx, code);

    if name.is_none() {
        if let Some(route) = page.resume().await {
            println!("Resuming {route}");
            return Ok(());
        }
    }

    match page.load().await {
        JoinPageView::Ready(info) => println!("{}", render::practice_link(&info)),
        view => {
            println!("{}", view.message().unwrap_or("Loading..."));
            return Ok(());
        }
    }

    let name = match name {
        Some(name) => name,
        None => page
            .remembered_name()
            .await
            .ok_or_else(|| anyhow!("--name is required for a first join"))?,
    };

    let route = page.join(&name).await?;
    println!("Joined, continue at {route}");
    Ok(())
}

async fn watch_session(ctx: &AppContext, session_id: &str) -> anyhow::Result<()> {
    let page = CollaborationPage::new(ctx, session_id);
    let mut observer = page.observe();
    let cancel = ctx.shutdown_token().clone();

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            state = observer.changed() => {
                let Some(state) = state else { break };
                let line = render::view(&ViewState::from_single(&state), render::session);
                if !line.is_empty() {
                    println!("{line}");
                }
            }
        }
    }
    Ok(())
}

async fn watch_analytics(ctx: &AppContext) -> anyhow::Result<()> {
    let dashboard = AnalyticsDashboard::new(ctx);
    let mut observers = dashboard.observe();
    let cancel = ctx.shutdown_token().clone();

    loop {
        let line = tokio::select! {
            () = cancel.cancelled() => break,
            state = observers.overview.changed() => match state {
                Some(state) => render::view(&ViewState::from_single(&state), render::overview),
                None => break,
            },
            state = observers.realtime.changed() => match state {
                Some(state) => render::view(&ViewState::from_single(&state), render::realtime),
                None => break,
            },
        };
        if !line.is_empty() {
            println!("{line}");
        }
    }
    Ok(())
}

async fn courses(ctx: &AppContext) -> anyhow::Result<()> {
    let state = CourseAdminPage::new(ctx).load().await;
    println!("{}", render::view(&state, |c| render::courses(c)));
    Ok(())
}

async fn upload_video(
    ctx: &AppContext,
    course_id: DbId,
    title: &str,
    order: u32,
    path: &Path,
) -> anyhow::Result<()> {
    let file = load_video(path).await?;

    let lesson = LessonsPage::new(ctx, course_id)
        .create(title, order, Some(file))
        .await?;
    tracing::info!(lesson_id = lesson.id, course_id, "Lesson created");
    Ok(())
}

/// Read a video from disk once its name and size pass the upload rule,
/// so a rejected file is never loaded into memory.
pub async fn load_video(path: &Path) -> anyhow::Result<VideoFile> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("{} has no file name", path.display()))?
        .to_string();
    let size = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len();
    validate_video_upload(&file_name, None, size)?;

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(VideoFile {
        file_name,
        content_type: None,
        bytes,
    })
}

async fn invite(ctx: &AppContext, course_id: DbId, emails: &[String]) -> anyhow::Result<()> {
    let result = InstructorPage::new(ctx)
        .send_invitations(course_id, &emails.join(" "))
        .await?;
    for failed in &result.failed {
        println!("Not sent: {} ({})", failed.email, failed.reason);
    }
    Ok(())
}

/// Print notifications until `cancel` fires, then drain what is queued.
pub async fn print_notifications(
    mut rx: broadcast::Receiver<Notification>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            received = rx.recv() => match received {
                Ok(n) => println!("{}", render::notification(&n)),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Notification printer lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return,
            },
            () = cancel.cancelled() => break,
        }
    }

    while let Ok(n) = rx.try_recv() {
        println!("{}", render::notification(&n));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnhub_core::error::CoreError;
    use learnhub_core::upload::MAX_VIDEO_SIZE_BYTES;

    #[tokio::test]
    async fn video_is_loaded_after_checks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intro.mp4");
        tokio::fs::write(&path, [7u8; 32]).await.unwrap();

        let file = load_video(&path).await.unwrap();
        assert_eq!(file.file_name, "intro.mp4");
        assert_eq!(file.bytes.len(), 32);
    }

    #[tokio::test]
    async fn wrong_type_is_rejected_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slides.pdf");
        tokio::fs::write(&path, b"%PDF").await.unwrap();

        let err = load_video(&path).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<CoreError>(), Some(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn oversized_file_is_rejected_from_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.mp4");
        // Sparse: the length is set without writing any data.
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(MAX_VIDEO_SIZE_BYTES + 1).unwrap();

        let err = load_video(&path).await.unwrap_err();
        assert!(err.to_string().contains("maximum is 500MB"), "{err}");
    }
}
