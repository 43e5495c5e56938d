//! End-to-end tests for help rendering through configured services

use rustserv_core::*;
use rustserv_services::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_help(share_dir: &Path, file: &str, content: &str) {
    let path = share_dir.join(file);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn config(share_dir: &Path) -> Config {
    let mut config: Config = toml::from_str(
        r#"
        [protocol]
        uses_halfops = true

        [auth]
        mode = "email"

        [modules]
        loaded = ["chanserv/main"]

        [[operclass]]
        name = "sra"
        privs = ["user:auspex"]

        [[operator]]
        account = "alice"
        operclass = "sra"

        [[service]]
        nick = "NickServ"

        [[service.help]]
        topic = "REGISTER"
        file = "help/nickserv/register"

        [[service.help]]
        topic = "INFO"
        file = "help/nickserv/info"

        [[service]]
        nick = "ChanServ"
        disp = "CS"

        [[service.help]]
        topic = "FLAGS"
        file = "help/cservice/flags"
        "#,
    )
    .unwrap();
    config.paths.share_dir = share_dir.to_string_lossy().into_owned();
    config
}

async fn help(manager: &mut ServiceManager, actor: &Actor, service: &str, line: &str) -> Transcript {
    let mut transcript = Transcript::new();
    let result = manager.dispatch(service, actor, line, &mut transcript).await.unwrap();
    assert_eq!(result, ServiceResult::Handled);
    transcript
}

#[tokio::test]
async fn test_conditional_help_file() {
    let dir = TempDir::new().unwrap();
    write_help(
        dir.path(),
        "help/nickserv/info",
        "Help for INFO:\n\
         \n\
         Syntax: INFO <nickname>\n\
         #if priv user:auspex\n\
         Operators also see hidden fields.\n\
         #endif\n\
         #if !module nickserv/hidemail\n\
         Email addresses are shown to everybody.\n\
         #endif\n\
         Example: /msg &nick& INFO foo\n",
    );

    let config = config(dir.path());
    let mut manager = ServiceManager::from_config(&config).await.unwrap();

    let user = help(&mut manager, &Actor::new("bob"), "nickserv", "HELP info").await;
    assert_eq!(
        user.lines(),
        vec![
            "***** \x02NickServ Help\x02 *****",
            "Help for INFO:",
            " ",
            "Syntax: INFO <nickname>",
            "Email addresses are shown to everybody.",
            "Example: /msg NickServ INFO foo",
            "***** \x02End of Help\x02 *****",
        ]
    );

    let oper = help(&mut manager, &Actor::with_account("Alice", "alice"), "NickServ", "help INFO").await;
    assert!(oper.lines().contains(&"Operators also see hidden fields."));
}

#[tokio::test]
async fn test_display_name_substitution() {
    let dir = TempDir::new().unwrap();
    write_help(
        dir.path(),
        "help/cservice/flags",
        "#if halfops\n+h is available.\n#endif\nSee /msg &nick& HELP or /msg &nick& FLAGS\n",
    );

    let config = config(dir.path());
    let mut manager = ServiceManager::from_config(&config).await.unwrap();
    let transcript = help(&mut manager, &Actor::new("bob"), "ChanServ", "HELP FLAGS").await;

    assert_eq!(
        transcript.lines(),
        vec![
            "***** \x02ChanServ Help\x02 *****",
            "+h is available.",
            "See /msg CS HELP or /msg CS FLAGS",
            "***** \x02End of Help\x02 *****",
        ]
    );
}

#[tokio::test]
async fn test_no_nick_ownership_uses_userserv_help() {
    let dir = TempDir::new().unwrap();
    write_help(dir.path(), "help/nickserv/register", "Registers a nickname.\n");
    write_help(dir.path(), "help/userserv/register", "Registers an account.\n");

    let mut config = config(dir.path());
    let mut manager = ServiceManager::from_config(&config).await.unwrap();
    let transcript = help(&mut manager, &Actor::new("bob"), "NickServ", "HELP REGISTER").await;
    assert!(transcript.lines().contains(&"Registers a nickname."));

    config.nickserv.no_nick_ownership = true;
    let mut manager = ServiceManager::from_config(&config).await.unwrap();
    let transcript = help(&mut manager, &Actor::new("bob"), "NickServ", "HELP REGISTER").await;
    assert!(transcript.lines().contains(&"Registers an account."));
}

#[tokio::test]
async fn test_missing_help_file() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());
    let mut manager = ServiceManager::from_config(&config).await.unwrap();

    let transcript = help(&mut manager, &Actor::new("bob"), "NickServ", "HELP REGISTER").await;
    assert_eq!(
        transcript.failures(),
        vec![(Fault::NoSuchTarget, "Could not get help file for \x02REGISTER\x02.")]
    );
    assert_eq!(transcript.replies().len(), 1);
}

#[tokio::test]
async fn test_unknown_topic() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());
    let mut manager = ServiceManager::from_config(&config).await.unwrap();

    let transcript = help(&mut manager, &Actor::new("bob"), "NickServ", "HELP SET PASSWORD").await;
    assert_eq!(
        transcript.failures(),
        vec![(Fault::NoSuchTarget, "No help available for \x02SET PASSWORD\x02.")]
    );
}

#[test]
fn test_absolute_help_path() {
    let dir = TempDir::new().unwrap();
    let absolute = dir.path().join("elsewhere/topic");
    write_help(dir.path(), "elsewhere/topic", "#if auth\nAuth is on.\n#endif\n");

    let mut config = config(Path::new("/nonexistent/share"));
    config.services[0].help.push(HelpEntryConfig::new(
        "ELSEWHERE",
        &absolute.to_string_lossy(),
        None,
    ));

    let renderer = HelpRenderer::from_config(&config);
    let mut registry = HelpRegistry::new();
    for entry in &config.services[0].help {
        registry.add_entry(&entry.topic, Some(&entry.file), None);
    }

    let actor = Actor::new("bob");
    let service = config.services[0].identity();
    let si = SourceInfo::new(&actor, &service);
    let mut transcript = Transcript::new();
    renderer.display(&registry, &si, "elsewhere", &mut transcript);

    assert_eq!(
        transcript.lines(),
        vec![
            "***** \x02NickServ Help\x02 *****",
            "Auth is on.",
            "***** \x02End of Help\x02 *****",
        ]
    );
}
