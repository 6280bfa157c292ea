//! End-to-end tests of the sync flow.

mod common;

use std::fs;
use std::sync::Arc;

use common::Fixture;
use stitch_core::testing::StaticGit;
use stitch_core::{
    ComponentKey, ComponentSelection, ConfigStore, StitchConfig, StitchEngine, StitchError,
    SystemGit,
};

fn engine(fixture: &Fixture) -> StitchEngine {
    StitchEngine::new(&fixture.project, Arc::new(StaticGit::new("1.0.0"))).unwrap()
}

fn write_config(engine: &StitchEngine, repository: &str, selections: &[(&str, &str, &str)]) {
    let mut config = StitchConfig::new(repository);
    for (category, name, variation) in selections {
        config.upsert(ComponentSelection::stamped(*category, *name, *variation, "1.0.0"));
    }
    ConfigStore::for_project(engine.project()).save(&config).unwrap();
}

#[test]
fn test_sync_without_config_fails() {
    let fixture = Fixture::new();
    let result = engine(&fixture).sync();

    match result {
        Err(err @ StitchError::ConfigurationNotFound(_)) => {
            assert!(err.to_string().contains("stitch.yaml"));
        }
        other => panic!("Expected ConfigurationNotFound, got {:?}", other),
    }
}

#[test]
fn test_sync_copies_components_templates_and_workflow() {
    let fixture = Fixture::new();
    let engine = engine(&fixture);
    write_config(
        &engine,
        &fixture.kb_str(),
        &[("tech-stack", "nestjs", "default"), ("tech-stack", "typescript", "default")],
    );

    let report = engine.sync().unwrap();

    assert!(fixture
        .project_file("docs/guidelines/tech-stack/nestjs/nestjs-structure.md")
        .is_file());
    assert!(fixture
        .project_file("docs/guidelines/tech-stack/typescript/typescript.md")
        .is_file());
    assert!(fixture.project_file("docs/templates/adr.md").is_file());
    assert!(report.templates_copied);
    assert_eq!(
        report.components,
        vec![
            ComponentKey::new("tech-stack", "nestjs"),
            ComponentKey::new("tech-stack", "typescript"),
        ]
    );
}

#[test]
fn test_sync_renders_workflow_from_project_tree() {
    let fixture = Fixture::new();
    let engine = engine(&fixture);
    write_config(&engine, &fixture.kb_str(), &[("tech-stack", "nestjs", "default")]);
    // Pre-existing project content is listed too.
    fs::create_dir_all(fixture.project_file("docs/guidelines/tech-stack/typescript")).unwrap();

    engine.sync().unwrap();

    let template = fixture.project_file("docs/guidelines/ai-tools/workflow.md.mustache");
    let rendered = fixture.project_file("docs/guidelines/ai-tools/workflow.md");
    assert!(!template.exists());
    let content = fs::read_to_string(rendered).unwrap();
    assert!(content.contains("tech-stack"));
    assert!(content.contains("nestjs"));
    assert!(content.contains("typescript"));
    assert!(content.contains("- [nestjs](docs/guidelines/tech-stack/nestjs)"));
    assert!(!content.contains("No guidelines synced."));
    assert!(!content.contains("&#x2F;"));
    assert!(!content.contains("ai-tools"));
}

#[test]
fn test_resync_after_variation_change_overwrites() {
    let fixture = Fixture::new();
    let engine = engine(&fixture);
    let structure = fixture.project_file("docs/guidelines/tech-stack/nestjs/nestjs-structure.md");

    write_config(&engine, &fixture.kb_str(), &[("tech-stack", "nestjs", "default")]);
    engine.sync().unwrap();
    assert!(fs::read_to_string(&structure).unwrap().contains("(default)"));

    write_config(&engine, &fixture.kb_str(), &[("tech-stack", "nestjs", "exp1")]);
    engine.sync().unwrap();
    assert!(fs::read_to_string(&structure).unwrap().contains("(exp1)"));
}

#[test]
fn test_sync_never_rewrites_config() {
    let fixture = Fixture::new();
    let engine = engine(&fixture);
    write_config(&engine, &fixture.kb_str(), &[("tech-stack", "nestjs", "default")]);
    let config_path = engine.project().config_path();
    let before = fs::read(&config_path).unwrap();

    engine.sync().unwrap();

    assert_eq!(fs::read(&config_path).unwrap(), before);
}

#[test]
fn test_sync_invalid_kb_path() {
    let fixture = Fixture::new();
    let engine = engine(&fixture);
    write_config(&engine, "/invalid/path", &[]);

    assert!(matches!(
        engine.sync(),
        Err(StitchError::InvalidKbRepository { .. })
    ));
}

#[test]
fn test_sync_kb_without_git_copies_nothing() {
    let fixture = Fixture::new();
    fs::remove_dir_all(fixture.kb.join(".git")).unwrap();
    let engine = engine(&fixture);
    write_config(
        &engine,
        &fixture.kb_str(),
        &[("tech-stack", "nestjs", "default"), ("tech-stack", "typescript", "default")],
    );

    match engine.sync() {
        Err(StitchError::InvalidKbRepository { reason, .. }) => {
            assert!(reason.contains(".git"));
        }
        other => panic!("Expected InvalidKbRepository, got {:?}", other),
    }
    assert!(!fixture.project_file("docs/guidelines").exists());
    assert!(!fixture.project_file("docs/templates").exists());
}

#[test]
fn test_sync_empty_selection_renders_inverted_section() {
    let fixture = Fixture::new();
    let engine = engine(&fixture);
    write_config(&engine, &fixture.kb_str(), &[]);

    engine.sync().unwrap();

    let content =
        fs::read_to_string(fixture.project_file("docs/guidelines/ai-tools/workflow.md")).unwrap();
    assert!(content.contains("No guidelines synced."));
    assert!(!content.contains("## "));
}

#[test]
fn test_sync_missing_component() {
    let fixture = Fixture::new();
    let engine = engine(&fixture);
    write_config(
        &engine,
        &fixture.kb_str(),
        &[("tech-stack", "nestjs", "default"), ("tech-stack", "nonexistent", "default")],
    );

    let err = engine.sync().unwrap_err();
    assert!(err.to_string().contains("Component not found in KB"));
    // Earlier components stay; rendering never happened.
    assert!(fixture
        .project_file("docs/guidelines/tech-stack/nestjs/nestjs-structure.md")
        .is_file());
    assert!(!fixture
        .project_file("docs/guidelines/ai-tools/workflow.md")
        .exists());
}

#[test]
fn test_sync_from_remote_clone() {
    let Some(fixture) = Fixture::with_git("main") else {
        return;
    };
    let engine = StitchEngine::new(&fixture.project, Arc::new(SystemGit)).unwrap();
    write_config(&engine, &fixture.kb_url(), &[("tech-stack", "nestjs", "default")]);

    let report = engine.sync().unwrap();

    assert_eq!(report.kb_commit, Some(fixture.head()));
    assert!(fixture
        .project_file("docs/guidelines/tech-stack/nestjs/nestjs-structure.md")
        .is_file());
    assert!(report.workflow_path.is_file());
}
