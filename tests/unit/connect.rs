use super::*;
use crate::{objects::node::Object, remote::memory::InMemoryHost};

#[test]
fn defaults_point_at_local_fusion() {
    let opts = ConnectOpts::default();
    assert_eq!(opts.app, "Fusion");
    assert_eq!(opts.ip, "127.0.0.1");
    assert_eq!(opts.timeout_secs, 0.1);
    assert_eq!(opts.uuid, None);
}

#[test]
fn partial_json_keeps_defaults() {
    let opts: ConnectOpts = serde_json::from_str(r#"{"ip": "10.0.0.5"}"#).unwrap();
    assert_eq!(opts.ip, "10.0.0.5");
    assert_eq!(opts.app, "Fusion");
}

#[test]
fn connect_wraps_the_application() {
    let host = Arc::new(InMemoryHost::new());
    let id = host.add_application(18.1, 2800.0).unwrap();
    let app = connect(&host, &ConnectOpts::default()).unwrap();
    assert_eq!(app.handle().id(), id);
    assert_eq!(app.version().unwrap(), 18.1);
}

#[test]
fn nothing_answering_is_a_remote_error() {
    let host = Arc::new(InMemoryHost::new());
    let err = connect(&host, &ConnectOpts::default()).unwrap_err();
    match err {
        FuError::Remote(msg) => assert_eq!(msg, "couldn't connect to application"),
        other => panic!("unexpected error: {other}"),
    }

    host.add_application(18.0, 1.0).unwrap();
    let opts = ConnectOpts {
        app: "Resolve".to_string(),
        ..ConnectOpts::default()
    };
    assert!(matches!(connect(&host, &opts), Err(FuError::Remote(_))));
}

#[test]
fn current_uuid_selects_the_running_application() {
    let host = Arc::new(InMemoryHost::new());
    assert_eq!(host.current_uuid().unwrap(), None);

    let id = host.add_application(18.0, 1.0).unwrap();
    let uuid = host.current_uuid().unwrap().unwrap();
    assert_eq!(uuid, format!("in-memory-{}", id.0));

    let opts = ConnectOpts {
        uuid: Some(uuid),
        ..ConnectOpts::default()
    };
    assert_eq!(connect(&host, &opts).unwrap().handle().id(), id);

    let other = ConnectOpts {
        uuid: Some("some-other-session".to_string()),
        ..ConnectOpts::default()
    };
    assert!(matches!(connect(&host, &other), Err(FuError::Remote(_))));
}
