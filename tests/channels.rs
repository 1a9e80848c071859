//! Channel configuration loading and construction, end to end.

use panoptes::{
    channels::build_channels,
    config::ConfigLoader,
    models::channel::{ChannelConfig, ChannelConfigError, ChannelTypeConfig},
};

fn write_channels_yaml(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("channels.yaml");
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

#[tokio::test]
async fn loads_and_builds_every_channel_kind() {
    let content = r#"
channels:
  - name: console
    stdout:
      message:
        title: "Occupancy alert"
        body: "Peak {{ aggregate }} over {{ threshold }}"
  - name: bell
    tone:
      repeats: 2
      interval_ms: 100
  - name: facilities-mail
    email:
      smtp_host: "smtp.example.com"
      from: "Panoptes <alerts@example.com>"
      to: ["facilities@example.com"]
      message:
        title: "Occupancy alert: {{ aggregate }}"
        body: "Peak {{ aggregate }} at {{ timestamp }}"
  - name: ops-hook
    webhook:
      url: "http://127.0.0.1:8080/hook"
      message:
        title: "Occupancy alert"
        body: "Peak {{ aggregate }}"
"#;
    let (_dir, path) = write_channels_yaml(content);

    let configs: Vec<ChannelConfig> = ConfigLoader::new(path).load_all().unwrap();
    assert_eq!(configs.len(), 4);
    assert!(matches!(configs[0].config, ChannelTypeConfig::Stdout(_)));
    assert!(matches!(configs[1].config, ChannelTypeConfig::Tone(_)));
    assert!(matches!(configs[2].config, ChannelTypeConfig::Email(_)));
    assert!(matches!(configs[3].config, ChannelTypeConfig::Webhook(_)));

    let channels = build_channels(&configs, reqwest::Client::new()).unwrap();
    assert_eq!(channels.len(), 4);
    assert_eq!(channels[2].0, "facilities-mail");
}

#[test]
fn email_defaults_apply_when_omitted() {
    let content = r#"
channels:
  - name: facilities-mail
    email:
      smtp_host: "smtp.example.com"
      from: "alerts@example.com"
      to: ["facilities@example.com"]
      message:
        title: "Occupancy alert"
        body: "Peak {{ aggregate }}"
"#;
    let (_dir, path) = write_channels_yaml(content);

    let configs: Vec<ChannelConfig> = ConfigLoader::new(path).load_all().unwrap();
    let ChannelTypeConfig::Email(email) = &configs[0].config else {
        panic!("expected an email channel");
    };
    assert_eq!(email.smtp_port, 587);
    assert!(email.username.is_none());
    assert!(email.attachments.is_empty());
}

#[test]
fn validation_rejects_an_email_channel_without_recipients() {
    let content = r#"
channels:
  - name: facilities-mail
    email:
      smtp_host: "smtp.example.com"
      from: "alerts@example.com"
      to: []
      message:
        title: "Occupancy alert"
        body: "Peak {{ aggregate }}"
"#;
    let (_dir, path) = write_channels_yaml(content);

    let result: Result<Vec<ChannelConfig>, _> = ConfigLoader::new(path).load_all();
    assert!(matches!(result, Err(ChannelConfigError::Validation(_))));
}

#[test]
fn loading_rejects_an_unknown_channel_kind() {
    let content = r#"
channels:
  - name: pager
    carrier_pigeon:
      loft: "roof"
"#;
    let (_dir, path) = write_channels_yaml(content);

    let result: Result<Vec<ChannelConfig>, _> = ConfigLoader::new(path).load_all();
    assert!(matches!(result, Err(ChannelConfigError::Loader(_))));
}
