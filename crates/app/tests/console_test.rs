//! Integration tests for the console front-end.
//!
//! These tests drive a console session with scripted input against a
//! file-backed config store in a temporary directory.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::path::PathBuf;
use std::time::Duration;

use pretty_assertions::assert_eq;
use rpcdesk::{Command, Console, Reply};
use rpcdesk_application::{IMPORT_PATHS_KEY, SCHEMA_FILES_KEY};
use rpcdesk_domain::DEFAULT_TAB_TITLE;
use rpcdesk_infrastructure::FileConfigStore;
use tempfile::tempdir;

async fn run_script(console: &mut Console<FileConfigStore>, script: &str) -> String {
    let mut output = Vec::new();
    console
        .run(script.as_bytes(), &mut output)
        .await
        .expect("console run");
    String::from_utf8(output).expect("utf-8 output")
}

async fn exec(console: &mut Console<FileConfigStore>, line: &str) -> String {
    match console
        .execute(Command::parse(line).expect("valid command"))
        .await
        .expect("command succeeds")
    {
        Reply::Output(text) => text,
        Reply::Quit => panic!("unexpected quit"),
    }
}

#[tokio::test]
async fn test_tab_lifecycle() {
    let temp = tempdir().expect("Failed to create temp directory");
    let mut console = Console::load(FileConfigStore::new(temp.path()))
        .await
        .unwrap();

    // New tab lands at the front, active and renaming
    assert_eq!(
        exec(&mut console, "new").await,
        format!("*~ 1. {DEFAULT_TAB_TITLE}\n   2. {DEFAULT_TAB_TITLE}")
    );

    assert_eq!(
        exec(&mut console, "rename 1 Greeter").await,
        format!("*  1. Greeter\n   2. {DEFAULT_TAB_TITLE}")
    );

    // Copy sits right after the original; selection stays put
    assert_eq!(
        exec(&mut console, "dup 1").await,
        format!("*  1. Greeter\n   2. Copy of Greeter\n   3. {DEFAULT_TAB_TITLE}")
    );

    assert_eq!(
        exec(&mut console, "select 2").await,
        format!("   1. Greeter\n*  2. Copy of Greeter\n   3. {DEFAULT_TAB_TITLE}")
    );

    assert_eq!(
        exec(&mut console, "move 3 1").await,
        format!("   1. {DEFAULT_TAB_TITLE}\n   2. Greeter\n*  3. Copy of Greeter")
    );

    // Closing the active last tab activates the new last tab
    assert_eq!(
        exec(&mut console, "close 3").await,
        format!("   1. {DEFAULT_TAB_TITLE}\n*  2. Greeter")
    );

    assert_eq!(
        exec(&mut console, "select 1").await,
        format!("*  1. {DEFAULT_TAB_TITLE}\n   2. Greeter")
    );
}

#[tokio::test]
async fn test_cancel_rename_keeps_title() {
    let temp = tempdir().expect("Failed to create temp directory");
    let mut console = Console::load(FileConfigStore::new(temp.path()))
        .await
        .unwrap();

    exec(&mut console, "new").await;
    assert_eq!(
        exec(&mut console, "cancel").await,
        format!("*  1. {DEFAULT_TAB_TITLE}\n   2. {DEFAULT_TAB_TITLE}")
    );
    assert!(console.tabs().state().renaming_id().is_none());

    exec(&mut console, "rename 2 Echo").await;
    assert_eq!(
        exec(&mut console, "rename 2").await,
        format!("*  1. {DEFAULT_TAB_TITLE}\n ~ 2. Echo")
    );
    assert_eq!(
        exec(&mut console, "rename cancel").await,
        format!("*  1. {DEFAULT_TAB_TITLE}\n   2. Echo")
    );
    assert_eq!(
        exec(&mut console, "cancel").await,
        format!("not renaming\n*  1. {DEFAULT_TAB_TITLE}\n   2. Echo")
    );
}

#[tokio::test]
async fn test_last_tab_cannot_be_closed() {
    let temp = tempdir().expect("Failed to create temp directory");
    let mut console = Console::load(FileConfigStore::new(temp.path()))
        .await
        .unwrap();

    assert_eq!(
        exec(&mut console, "close 1").await,
        format!("cannot close the last tab\n*  1. {DEFAULT_TAB_TITLE}")
    );
    assert_eq!(
        exec(&mut console, "close 5").await,
        format!("no tab at position 5\n*  1. {DEFAULT_TAB_TITLE}")
    );
    assert_eq!(console.tabs().state().len(), 1);
}

#[tokio::test]
async fn test_set_and_show_active_tab() {
    let temp = tempdir().expect("Failed to create temp directory");
    let mut console = Console::load(FileConfigStore::new(temp.path()))
        .await
        .unwrap();

    exec(&mut console, "set address localhost:50051").await;
    exec(&mut console, "set method greet.Greeter/SayHello").await;
    exec(&mut console, "set body {\"name\": \"x\"}").await;

    assert_eq!(
        exec(&mut console, "show").await,
        format!(
            "title: {DEFAULT_TAB_TITLE}\n\
             address: localhost:50051\n\
             method: greet.Greeter/SayHello\n\
             request:\n{{\"name\": \"x\"}}\n\
             response:\n"
        )
    );
}

#[tokio::test]
async fn test_schema_sources_persist_across_sessions() {
    let temp = tempdir().expect("Failed to create temp directory");
    let store = FileConfigStore::new(temp.path().join("config"));

    let mut console = Console::load(store.clone()).await.unwrap();
    exec(&mut console, "schema add-import /protos").await;
    exec(&mut console, "schema add-file /protos/greet.proto").await;

    assert!(store.dir().join(format!("{IMPORT_PATHS_KEY}.json")).exists());
    assert!(store.dir().join(format!("{SCHEMA_FILES_KEY}.json")).exists());

    let reopened = Console::load(store.clone()).await.unwrap();
    assert_eq!(
        reopened.schema().schema_files,
        vec![PathBuf::from("/protos/greet.proto")]
    );
    assert_eq!(
        reopened.schema().effective_import_paths(),
        vec![PathBuf::from("/protos")]
    );

    // Emptying a list removes its entry
    let mut console = reopened;
    exec(&mut console, "schema remove-import /protos").await;
    assert!(!store.dir().join(format!("{IMPORT_PATHS_KEY}.json")).exists());
}

#[tokio::test]
async fn test_run_script_stops_at_quit() {
    let temp = tempdir().expect("Failed to create temp directory");
    let mut console = Console::load(FileConfigStore::new(temp.path()))
        .await
        .unwrap();

    let output = run_script(&mut console, "new\n\nbogus\nquit\nnew\n").await;

    assert_eq!(
        output,
        format!(
            "*~ 1. {DEFAULT_TAB_TITLE}\n   2. {DEFAULT_TAB_TITLE}\n\
             unknown command: bogus (try `help`)\n"
        )
    );
    assert_eq!(console.tabs().state().len(), 2);
}

#[tokio::test]
async fn test_watched_schema_sources_follow_external_edits() {
    let temp = tempdir().expect("Failed to create temp directory");
    let store = FileConfigStore::new(temp.path());
    let mut console = Console::load(store.clone()).await.unwrap();
    console.watch_config().expect("watch config dir");

    let mut other = Console::load(store.clone()).await.unwrap();
    exec(&mut other, "schema add-file /protos/greet.proto").await;

    let expected = vec![PathBuf::from("/protos/greet.proto")];
    // A change can be reported before the write lands, so keep reloading
    let reloaded = tokio::time::timeout(Duration::from_secs(10), async {
        while let Some(key) = console.next_config_change().await {
            assert!(key == IMPORT_PATHS_KEY || key == SCHEMA_FILES_KEY);
            if matches!(console.reload_schema().await, Ok(true))
                && console.schema().schema_files == expected
            {
                return true;
            }
        }
        false
    })
    .await
    .expect("change reported in time");

    assert!(reloaded);
    assert!(!console.reload_schema().await.unwrap());
}
