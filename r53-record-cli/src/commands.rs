//! 子命令实现

use anyhow::{Context, Result, bail};

use r53_record_core::{RecordService, RecordState};

use crate::cli::Command;
use crate::state::{StateFile, load_config};

pub async fn dispatch(command: Command, svc: &RecordService, state: &StateFile) -> Result<()> {
    match command {
        Command::Apply { config } => {
            let desired = load_config(&config)?.validate()?;
            let next = match state.load()? {
                None => {
                    tracing::info!("No prior state, creating {}", desired.identity());
                    svc.create(&desired).await?
                }
                // 托管区或名称变化需要替换
                Some(prior)
                    if prior.zone_id != desired.zone_id
                        || prior.identity().name != desired.identity().name =>
                {
                    tracing::info!("Replacing {} with {}", prior.id, desired.identity());
                    svc.delete(&prior).await?;
                    state.remove()?;
                    svc.create(&desired).await?
                }
                Some(prior) => svc.update(&prior, &desired).await?,
            };
            state.save(&next)?;
            print_state(&next)
        }
        Command::Refresh => {
            let prior = state.require()?;
            match svc.read(&prior).await? {
                Some(current) => {
                    state.save(&current)?;
                    print_state(&current)
                }
                None => {
                    tracing::warn!("Record {} is gone, dropping state", prior.id);
                    state.remove()
                }
            }
        }
        Command::Destroy => {
            let prior = state.require()?;
            svc.delete(&prior).await?;
            state.remove()?;
            tracing::info!("Destroyed {}", prior.id);
            Ok(())
        }
        Command::Import { id } => {
            if let Some(existing) = state.load()? {
                bail!(
                    "State file {} already tracks {}",
                    state.path().display(),
                    existing.id
                );
            }
            let Some(imported) = svc.import(&id).await? else {
                bail!("Cannot import non-existent remote object {id}");
            };
            state.save(&imported)?;
            print_state(&imported)
        }
    }
}

fn print_state(state: &RecordState) -> Result<()> {
    let json = serde_json::to_string_pretty(state).context("Failed to render state")?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use r53_record_core::test_utils::{FakeRoute53, create_test_context};
    use r53_record_provider::{RecordType, ResourceRecordSet};
    use tempfile::TempDir;

    struct Fixture {
        fake: Arc<FakeRoute53>,
        svc: RecordService,
        state: StateFile,
        dir: TempDir,
    }

    fn fixture() -> Fixture {
        let fake = Arc::new(FakeRoute53::with_zone("Z1", "example.com."));
        let svc = RecordService::with_seed(create_test_context(fake.clone()), 1);
        let dir = TempDir::new().unwrap();
        let state = StateFile::new(dir.path().join("state.json"));
        Fixture {
            fake,
            svc,
            state,
            dir,
        }
    }

    fn write_config(dir: &Path, name: &str, value: &str) -> PathBuf {
        let path = dir.join(format!("{name}.json"));
        let json = format!(
            r#"{{"zone_id":"Z1","name":"{name}","type":"A","ttl":300,"records":["{value}"]}}"#
        );
        std::fs::write(&path, json).unwrap();
        path
    }

    async fn apply(f: &Fixture, name: &str, value: &str) -> Result<()> {
        let config = write_config(f.dir.path(), name, value);
        dispatch(Command::Apply { config }, &f.svc, &f.state).await
    }

    #[tokio::test(start_paused = true)]
    async fn apply_without_state_creates() {
        let f = fixture();
        apply(&f, "www", "192.0.2.1").await.unwrap();

        let saved = f.state.require().unwrap();
        assert_eq!(saved.id, "Z1_www_A");
        assert!(
            f.fake
                .record("Z1", "www.example.com.", "A", None)
                .await
                .is_some()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn apply_with_state_updates_in_place() {
        let f = fixture();
        apply(&f, "www", "192.0.2.1").await.unwrap();
        apply(&f, "www", "192.0.2.2").await.unwrap();

        let saved = f.state.require().unwrap();
        assert_eq!(saved.records, vec!["192.0.2.2".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn apply_name_change_replaces_record() {
        let f = fixture();
        apply(&f, "www", "192.0.2.1").await.unwrap();
        apply(&f, "web", "192.0.2.1").await.unwrap();

        let saved = f.state.require().unwrap();
        assert_eq!(saved.id, "Z1_web_A");
        assert!(
            f.fake
                .record("Z1", "www.example.com.", "A", None)
                .await
                .is_none()
        );
        assert!(
            f.fake
                .record("Z1", "web.example.com.", "A", None)
                .await
                .is_some()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_drops_state_when_record_gone() {
        let f = fixture();
        apply(&f, "www", "192.0.2.1").await.unwrap();
        f.fake
            .remove_record("Z1", "www.example.com.", "A", None)
            .await;

        dispatch(Command::Refresh, &f.svc, &f.state).await.unwrap();
        assert!(f.state.load().unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_without_state_fails() {
        let f = fixture();
        assert!(dispatch(Command::Refresh, &f.svc, &f.state).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn destroy_deletes_record_and_state() {
        let f = fixture();
        apply(&f, "www", "192.0.2.1").await.unwrap();

        dispatch(Command::Destroy, &f.svc, &f.state).await.unwrap();
        assert!(!f.state.path().exists());
        assert!(
            f.fake
                .record("Z1", "www.example.com.", "A", None)
                .await
                .is_none()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn import_adopts_existing_record() {
        let f = fixture();
        f.fake
            .insert_record(
                "Z1",
                ResourceRecordSet::simple(
                    "mail.example.com.",
                    RecordType::A,
                    60,
                    vec!["192.0.2.25".to_string()],
                ),
            )
            .await;

        let id = "Z1_mail_A".to_string();
        dispatch(Command::Import { id }, &f.svc, &f.state)
            .await
            .unwrap();
        assert_eq!(f.state.require().unwrap().id, "Z1_mail_A");
    }

    #[tokio::test(start_paused = true)]
    async fn import_refuses_when_state_exists() {
        let f = fixture();
        apply(&f, "www", "192.0.2.1").await.unwrap();

        let id = "Z1_other_A".to_string();
        let err = dispatch(Command::Import { id }, &f.svc, &f.state)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already tracks Z1_www_A"));
        assert_eq!(f.state.require().unwrap().id, "Z1_www_A");
    }

    #[tokio::test(start_paused = true)]
    async fn import_absent_record_fails() {
        let f = fixture();
        let id = "Z1_ghost_A".to_string();
        let err = dispatch(Command::Import { id }, &f.svc, &f.state)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("non-existent"));
        assert!(f.state.load().unwrap().is_none());
    }
}
