use async_trait::async_trait;
use indexsync_diff::{SettingsPatch, WarningMode};
use indexsync_engine::{
    ClientError, EngineError, IndexClient, ReconcileConfig, ReconcileStage,
    ReconciliationOrchestrator, ReplaceReason,
};
use indexsync_model::{Alias, AliasSet, FieldNode, IndexState, MappingTree, SettingsMap};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Mutex;

/// In-memory client recording every call in order.
#[derive(Default)]
struct RecordingClient {
    calls: Mutex<Vec<String>>,
    bodies: Mutex<Vec<Value>>,
    fail_on: Option<&'static str>,
}

impl RecordingClient {
    fn failing_on(operation: &'static str) -> Self {
        Self {
            fail_on: Some(operation),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn bodies(&self) -> Vec<Value> {
        self.bodies.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str, call: String, body: Value) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(call);
        self.bodies.lock().unwrap().push(body);
        if self.fail_on == Some(operation) {
            return Err(ClientError::new(operation, "boom").with_status(500));
        }
        Ok(())
    }
}

#[async_trait]
impl IndexClient for RecordingClient {
    async fn delete_alias(&self, index: &str, name: &str) -> Result<(), ClientError> {
        self.record("delete_alias", format!("delete_alias {index} {name}"), Value::Null)
    }

    async fn put_alias(&self, index: &str, alias: &Alias) -> Result<(), ClientError> {
        self.record("put_alias", format!("put_alias {index} {}", alias.name), alias.body())
    }

    async fn put_settings(&self, index: &str, patch: &SettingsPatch) -> Result<(), ClientError> {
        self.record("put_settings", format!("put_settings {index}"), patch.to_json())
    }

    async fn put_mapping(&self, index: &str, mappings: &MappingTree) -> Result<(), ClientError> {
        self.record("put_mapping", format!("put_mapping {index}"), mappings.to_json())
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn observed() -> IndexState {
    IndexState::new("logs")
        .with_mappings(MappingTree::new().with_field("msg", FieldNode::leaf("text")))
        .with_settings(
            SettingsMap::new()
                .with("number_of_shards", "1")
                .with("number_of_replicas", "1")
                .with("refresh_interval", "1s"),
        )
        .with_aliases(AliasSet::new().with(Alias::new("old")).with(Alias::new("keep")))
}

fn engine() -> ReconciliationOrchestrator {
    ReconciliationOrchestrator::new(ReconcileConfig::default())
}

// ── Plan ─────────────────────────────────────────────────────────

#[test]
fn unchanged_index_plans_nothing_but_alias_upserts() {
    let state = observed();
    let result = engine().plan(&state, &state).unwrap();

    assert!(!result.requires_replace);
    assert!(result.settings_patch.is_empty());
    assert!(result.mapping_update.is_none());
    assert!(result.alias_patch.to_delete.is_empty());
    assert_eq!(result.alias_patch.to_upsert.len(), 2);
    assert_eq!(result.stage(), ReconcileStage::Diffing);
}

#[test]
fn mapping_type_change_requires_replace() {
    let desired = observed()
        .with_mappings(MappingTree::new().with_field("msg", FieldNode::leaf("keyword")));
    let result = engine().plan(&desired, &observed()).unwrap();

    assert!(result.requires_replace);
    assert_eq!(result.replace_reasons, vec![ReplaceReason::MappingChanged]);
    assert!(result.settings_patch.is_empty());
    assert!(result.alias_patch.is_empty());
    assert!(result.mapping_update.is_none());
    assert_eq!(
        result.stages,
        vec![
            ReconcileStage::Pending,
            ReconcileStage::Diffing,
            ReconcileStage::ReplaceRequired,
            ReconcileStage::Done
        ]
    );
}

#[test]
fn static_setting_change_requires_replace() {
    let mut desired = observed();
    desired.settings.insert("number_of_shards", 3);
    let result = engine().plan(&desired, &observed()).unwrap();

    assert!(result.requires_replace);
    match &result.replace_reasons[..] {
        [ReplaceReason::StaticSetting(change)] => assert_eq!(change.key, "number_of_shards"),
        other => panic!("unexpected reasons: {other:?}"),
    }
}

#[test]
fn renamed_index_requires_replace() {
    let mut desired = observed();
    desired.name = "logs-v2".to_string();
    let result = engine().plan(&desired, &observed()).unwrap();

    assert!(result.requires_replace);
    assert!(matches!(
        &result.replace_reasons[0],
        ReplaceReason::NameChanged { desired, .. } if desired == "logs-v2"
    ));
}

#[test]
fn removed_field_warns_and_is_not_sent_again() {
    let desired = observed().with_mappings(MappingTree::new());
    let result = engine().plan(&desired, &observed()).unwrap();

    assert!(!result.requires_replace);
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.merged_mappings, observed().mappings);
    assert!(result.mapping_update.is_none());
}

#[test]
fn added_field_produces_mapping_update() {
    let desired = observed().with_mappings(
        MappingTree::new()
            .with_field("msg", FieldNode::leaf("text"))
            .with_field("host", FieldNode::leaf("keyword")),
    );
    let result = engine().plan(&desired, &observed()).unwrap();

    let update = result.mapping_update.expect("mapping update");
    assert_eq!(
        update.to_json(),
        json!({"properties": {"host": {"type": "keyword"}, "msg": {"type": "text"}}})
    );
}

#[test]
fn root_parameter_change_alone_produces_mapping_update() {
    let observed = IndexState::new("logs");
    let mut mappings = MappingTree::new();
    mappings.params.insert("dynamic".into(), json!("strict"));
    let desired = IndexState::new("logs").with_mappings(mappings);

    let result = engine().plan(&desired, &observed).unwrap();

    let update = result.mapping_update.expect("mapping update");
    assert_eq!(update.to_json(), json!({"dynamic": "strict", "properties": {}}));
}

#[test]
fn unknown_setting_is_a_hard_error() {
    let mut desired = observed();
    desired.settings.insert("made.up", "1");
    let err = engine().plan(&desired, &observed()).unwrap_err();
    assert!(matches!(err, EngineError::Diff(_)));
}

#[test]
fn collect_all_reports_warnings_alongside_replace() {
    let observed = observed().with_mappings(
        MappingTree::new()
            .with_field("a", FieldNode::leaf("keyword"))
            .with_field("b", FieldNode::leaf("text")),
    );
    let desired = observed
        .clone()
        .with_mappings(MappingTree::new().with_field("a", FieldNode::leaf("long")));
    let config = ReconcileConfig {
        mapping_warnings: WarningMode::CollectAll,
        ..Default::default()
    };
    let result = ReconciliationOrchestrator::new(config)
        .plan(&desired, &observed)
        .unwrap();

    assert!(result.requires_replace);
    assert_eq!(result.warnings.len(), 1);
}

// ── Apply ────────────────────────────────────────────────────────

#[tokio::test]
async fn apply_orders_aliases_settings_mappings() {
    init_tracing();
    let desired = observed()
        .with_mappings(
            MappingTree::new()
                .with_field("msg", FieldNode::leaf("text"))
                .with_field("host", FieldNode::leaf("keyword")),
        )
        .with_settings(
            SettingsMap::new()
                .with("number_of_shards", "1")
                .with("number_of_replicas", 2),
        )
        .with_aliases(AliasSet::new().with(Alias::new("keep")).with(Alias::new("new")));
    let client = RecordingClient::default();

    let result = engine().apply(&client, &desired, &observed()).await.unwrap();

    assert_eq!(
        client.calls(),
        vec![
            "delete_alias logs old",
            "put_alias logs keep",
            "put_alias logs new",
            "put_settings logs",
            "put_mapping logs",
        ]
    );
    assert_eq!(
        client.bodies()[3],
        json!({"number_of_replicas": 2, "refresh_interval": null})
    );
    assert_eq!(result.stage(), ReconcileStage::Done);
    assert_eq!(
        result.stages,
        vec![
            ReconcileStage::Pending,
            ReconcileStage::Diffing,
            ReconcileStage::ApplyingAliases,
            ReconcileStage::ApplyingSettings,
            ReconcileStage::ApplyingMappings,
            ReconcileStage::Done
        ]
    );
}

#[tokio::test]
async fn apply_skips_empty_settings_and_mappings() {
    let state = observed();
    let client = RecordingClient::default();

    engine().apply(&client, &state, &state).await.unwrap();

    assert_eq!(client.calls(), vec!["put_alias logs keep", "put_alias logs old"]);
}

#[tokio::test]
async fn replace_issues_no_calls() {
    let mut desired = observed();
    desired.settings.insert("codec", "best_compression");
    let client = RecordingClient::default();

    let result = engine().apply(&client, &desired, &observed()).await.unwrap();

    assert!(result.requires_replace);
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn dry_run_issues_no_calls() {
    let desired = observed().with_aliases(AliasSet::new());
    let client = RecordingClient::default();
    let config = ReconcileConfig {
        dry_run: true,
        ..Default::default()
    };

    let result = ReconciliationOrchestrator::new(config)
        .apply(&client, &desired, &observed())
        .await
        .unwrap();

    assert!(client.calls().is_empty());
    assert_eq!(result.alias_patch.to_delete.len(), 2);
    assert_eq!(result.stage(), ReconcileStage::Done);
}

#[tokio::test]
async fn client_failure_stops_later_stages() {
    init_tracing();
    let desired = observed().with_settings(
        SettingsMap::new()
            .with("number_of_shards", "1")
            .with("number_of_replicas", 5),
    );
    let client = RecordingClient::failing_on("put_settings");

    let err = engine()
        .apply(&client, &desired, &observed())
        .await
        .unwrap_err();

    match err {
        EngineError::Client { stage, source } => {
            assert_eq!(stage, ReconcileStage::ApplyingSettings);
            assert_eq!(source.status, Some(500));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!client.calls().iter().any(|c| c.starts_with("put_mapping")));
}

#[tokio::test]
async fn works_through_trait_object() {
    let client = RecordingClient::default();
    let dyn_client: &dyn IndexClient = &client;
    let state = observed();

    let result = engine().apply(dyn_client, &state, &state).await.unwrap();
    assert!(!result.requires_replace);
}
