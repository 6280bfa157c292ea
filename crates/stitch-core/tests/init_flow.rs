//! End-to-end tests of the init flow.

mod common;

use std::sync::Arc;

use common::Fixture;
use pretty_assertions::assert_eq;
use stitch_core::testing::{Answer, RecordingReporter, ScriptedInput, StaticGit};
use stitch_core::{
    Action, ComponentSelection, ConfigStore, InitOutcome, StitchConfig, StitchEngine, StitchError,
    SystemGit,
};

const COMMIT: &str = "0123456789abcdef0123456789abcdef01234567";

fn engine(fixture: &Fixture) -> StitchEngine {
    StitchEngine::new(&fixture.project, Arc::new(StaticGit::new(COMMIT))).unwrap()
}

fn action(a: Action) -> Answer {
    Answer::select(a.label())
}

fn init(engine: &StitchEngine, answers: Vec<Answer>) -> Result<InitOutcome, StitchError> {
    let reporter = RecordingReporter::new();
    let mut input = ScriptedInput::new(answers);
    let outcome = engine.init(None, &mut input, &reporter);
    assert_eq!(input.remaining(), 0, "unconsumed scripted answers");
    outcome
}

fn read_config(engine: &StitchEngine) -> StitchConfig {
    ConfigStore::for_project(engine.project()).load().unwrap()
}

/// Fresh init selecting `tech-stack/nestjs/default`.
fn create_default_config(fixture: &Fixture, engine: &StitchEngine) {
    let outcome = init(
        engine,
        vec![
            Answer::text(fixture.kb_str()),
            action(Action::Add),
            Answer::select_many(["tech-stack/nestjs/default"]),
            action(Action::Save),
        ],
    )
    .unwrap();
    assert_eq!(outcome, InitOutcome::Saved { components: 1 });
}

#[test]
fn test_init_with_kb_path() {
    let fixture = Fixture::new();
    let engine = engine(&fixture);
    create_default_config(&fixture, &engine);

    let mut expected = StitchConfig::new(fixture.kb_str());
    expected.upsert(ComponentSelection::stamped(
        "tech-stack",
        "nestjs",
        "default",
        COMMIT,
    ));
    assert_eq!(read_config(&engine), expected);
}

#[test]
fn test_exit_without_saving_keeps_file() {
    let fixture = Fixture::new();
    let engine = engine(&fixture);
    create_default_config(&fixture, &engine);

    let outcome = init(
        &engine,
        vec![
            Answer::Confirm(true),
            action(Action::Remove),
            Answer::select_many(["tech-stack/nestjs/default"]),
            action(Action::Exit),
            Answer::Confirm(true),
        ],
    )
    .unwrap();

    assert_eq!(outcome, InitOutcome::Discarded);
    assert_eq!(read_config(&engine).components.len(), 1);
}

#[test]
fn test_edit_adds_component() {
    let fixture = Fixture::new();
    let engine = engine(&fixture);
    create_default_config(&fixture, &engine);

    init(
        &engine,
        vec![
            Answer::Confirm(true),
            action(Action::Add),
            Answer::select_many(["tech-stack/typescript/default"]),
            action(Action::Save),
        ],
    )
    .unwrap();

    let names: Vec<_> = read_config(&engine)
        .components
        .into_iter()
        .map(|c| c.triple())
        .collect();
    assert_eq!(
        names,
        vec!["tech-stack/nestjs/default", "tech-stack/typescript/default"]
    );
}

#[test]
fn test_selecting_variation_replaces_component() {
    let fixture = Fixture::new();
    let engine = engine(&fixture);
    create_default_config(&fixture, &engine);

    let reporter = RecordingReporter::new();
    let mut input = ScriptedInput::new([
        Answer::Confirm(true),
        action(Action::Add),
        Answer::select_many(["tech-stack/nestjs/exp1"]),
        action(Action::Save),
    ]);
    engine.init(None, &mut input, &reporter).unwrap();

    let config = read_config(&engine);
    assert_eq!(config.components.len(), 1);
    assert_eq!(config.components[0].variation, "exp1");
    assert!(reporter.contains("Replacing tech-stack/nestjs/default with tech-stack/nestjs/exp1"));
}

#[test]
fn test_multiple_selections() {
    let fixture = Fixture::new();
    let engine = engine(&fixture);
    create_default_config(&fixture, &engine);

    init(
        &engine,
        vec![
            Answer::Confirm(true),
            action(Action::Add),
            Answer::select_many(["tech-stack/nestjs/exp1", "tech-stack/typescript/default"]),
            action(Action::Save),
        ],
    )
    .unwrap();

    let config = read_config(&engine);
    assert_eq!(config.components.len(), 2);
    assert!(config
        .components
        .iter()
        .any(|c| c.name == "nestjs" && c.variation == "exp1"));
    assert!(config
        .components
        .iter()
        .any(|c| c.name == "typescript" && c.variation == "default"));
}

#[test]
fn test_kb_without_git_metadata_is_rejected() {
    let fixture = Fixture::new();
    std::fs::remove_dir_all(fixture.kb.join(".git")).unwrap();
    let engine = engine(&fixture);

    let result = init(&engine, vec![Answer::text(fixture.kb_str())]);
    match result {
        Err(err @ StitchError::InvalidKbRepository { .. }) => {
            assert!(err.to_string().contains("Invalid KB repository"));
        }
        other => panic!("Expected InvalidKbRepository, got {:?}", other),
    }
    assert!(!ConfigStore::for_project(engine.project()).exists());
}

#[test]
fn test_cancelled_prompt_leaves_saved_config() {
    let fixture = Fixture::new();
    let engine = engine(&fixture);
    create_default_config(&fixture, &engine);

    let result = init(&engine, vec![Answer::Confirm(true), Answer::Cancel]);
    assert!(matches!(result, Err(StitchError::PromptCancelled)));
    assert_eq!(read_config(&engine).components.len(), 1);
}

#[test]
fn test_real_git_stamps_head_commit() {
    let Some(fixture) = Fixture::with_git("main") else {
        return;
    };
    let engine = StitchEngine::new(&fixture.project, Arc::new(SystemGit)).unwrap();
    create_default_config(&fixture, &engine);

    let config = read_config(&engine);
    assert_eq!(config.components[0].current_version, fixture.head());
    assert_eq!(config.components[0].checked_version, fixture.head());
}

#[test]
fn test_remote_reference_is_cloned_and_recorded_verbatim() {
    let Some(fixture) = Fixture::with_git("master") else {
        return;
    };
    let engine = StitchEngine::new(&fixture.project, Arc::new(SystemGit)).unwrap();

    let reporter = RecordingReporter::new();
    let mut input = ScriptedInput::new([
        action(Action::Add),
        Answer::select_many(["tech-stack/typescript/default"]),
        action(Action::Save),
    ]);
    let url = fixture.kb_url();
    let outcome = engine.init(Some(&url), &mut input, &reporter).unwrap();

    assert_eq!(outcome, InitOutcome::Saved { components: 1 });
    let config = read_config(&engine);
    assert_eq!(config.kb.repository, url);
    assert_eq!(config.components[0].current_version, fixture.head());
}
