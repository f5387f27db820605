use std::path::PathBuf;

use clap::{Parser, Subcommand};
use learnhub_core::types::DbId;

#[derive(Debug, Parser)]
#[command(name = "learnhub", version, about = "Learning platform client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Join a guest practice session by link code.
    Join {
        code: String,
        /// Display name; defaults to the name used last time. Without a
        /// name an earlier session on this device is resumed.
        #[arg(long)]
        name: Option<String>,
    },
    /// Follow a collaboration session until interrupted.
    WatchSession { session_id: String },
    /// Follow the platform analytics dashboard until interrupted.
    WatchAnalytics,
    /// List courses.
    Courses,
    /// Upload a lesson video and create the lesson.
    UploadVideo {
        #[arg(long)]
        course: DbId,
        #[arg(long)]
        title: String,
        #[arg(long, default_value_t = 1)]
        order: u32,
        file: PathBuf,
    },
    /// Invite students to a course.
    Invite {
        #[arg(long)]
        course: DbId,
        #[arg(required = true)]
        emails: Vec<String>,
    },
    /// Forget stored credentials.
    SignOut,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_with_name() {
        let cli = Cli::try_parse_from(["learnhub", "join", "abc123", "--name", "Test Student"])
            .unwrap();
        match cli.command {
            Command::Join { code, name } => {
                assert_eq!(code, "abc123");
                assert_eq!(name.as_deref(), Some("Test Student"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn upload_defaults_order() {
        let cli = Cli::try_parse_from([
            "learnhub",
            "upload-video",
            "--course",
            "3",
            "--title",
            "Intro",
            "intro.mp4",
        ])
        .unwrap();
        match cli.command {
            Command::UploadVideo { course, order, file, .. } => {
                assert_eq!(course, 3);
                assert_eq!(order, 1);
                assert_eq!(file, PathBuf::from("intro.mp4"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn invite_needs_an_address() {
        assert!(Cli::try_parse_from(["learnhub", "invite", "--course", "1"]).is_err());
    }
}
