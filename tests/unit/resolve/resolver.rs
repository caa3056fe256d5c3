use super::*;
use crate::{
    foundation::core::Attrs,
    objects::{
        application::Application,
        composition::Composition,
        image::Image,
        link::{Input, Link, Output},
        tool::Tool,
    },
    remote::ambient::AmbientSlots,
    remote::memory::{InMemoryHost, ObjectRecord},
};

fn record(label: &str, attrs: &[&str]) -> ObjectRecord {
    ObjectRecord {
        label: label.to_string(),
        attrs: attrs
            .iter()
            .map(|k| (k.to_string(), Value::Bool(true)))
            .collect::<Attrs>(),
        ..ObjectRecord::default()
    }
}

fn host_with(records: Vec<ObjectRecord>) -> (Arc<InMemoryHost>, Vec<HandleId>) {
    let host = Arc::new(InMemoryHost::new());
    let ids = records
        .into_iter()
        .map(|r| host.insert(r).unwrap())
        .collect();
    (host, ids)
}

#[test]
fn tool_attributes_resolve_to_tool() {
    let (host, ids) = host_with(vec![record("Blur1", &["TOOLS_Name", "TOOLB_Visible"])]);
    let node = Resolver::new(host)
        .resolve_node(Kind::Object, Candidate::Handle(ids[0]))
        .unwrap();
    assert_eq!(node.kind(), Kind::Tool);
    assert_eq!(node.handle().id(), ids[0]);
}

#[test]
fn empty_attributes_fall_back_to_image_label() {
    let (host, ids) = host_with(vec![record("Image 512x256", &[])]);
    let img: Image = Resolver::new(host).resolve(ids[0]).unwrap();
    assert_eq!(img.kind(), Kind::Image);
}

#[test]
fn image_resolves_through_parameter_request() {
    let (host, ids) = host_with(vec![record("Image 64x64", &[])]);
    let node = Resolver::new(host)
        .resolve_node(Kind::Parameter, Candidate::Handle(ids[0]))
        .unwrap();
    assert_eq!(node.kind(), Kind::Image);
}

#[test]
fn prefix_priority_ignores_other_names_and_order() {
    let (host, ids) = host_with(vec![
        record("a", &["ZZZ_Extra", "TOOLS_Name", "AAA_Other"]),
        record("b", &["OUTS_Name", "COMPS_FileName"]),
        record("c", &["VIEWS_Name", "INPS_DataType"]),
    ]);
    let resolver = Resolver::new(host);
    let kinds: Vec<Kind> = ids
        .iter()
        .map(|id| resolver.infer_kind(*id).unwrap())
        .collect();
    assert_eq!(kinds, vec![Kind::Tool, Kind::Composition, Kind::Input]);
}

#[test]
fn unknown_attributes_are_unresolvable() {
    let (host, ids) = host_with(vec![
        record("Mystery thing", &["XYZ_Foo"]),
        record("Widget 3", &[]),
    ]);
    let resolver = Resolver::new(host);
    for id in ids {
        let err = resolver
            .resolve_node(Kind::Object, Candidate::Handle(id))
            .unwrap_err();
        match err {
            FuError::UnresolvableReference { handle, .. } => assert_eq!(handle, id),
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn image_label_does_not_override_attributes() {
    let (host, ids) = host_with(vec![record("Image 1x1", &["XYZ_Foo"])]);
    let err = Resolver::new(host).infer_kind(ids[0]).unwrap_err();
    assert!(matches!(err, FuError::UnresolvableReference { .. }));
}

#[test]
fn mismatched_request_names_both_kinds() {
    let (host, ids) = host_with(vec![record("in", &["INPS_DataType"])]);
    let err = Resolver::new(host).resolve::<Output>(ids[0]).unwrap_err();
    match &err {
        FuError::TypeMismatch {
            requested,
            resolved,
        } => {
            assert_eq!(*requested, Kind::Output);
            assert_eq!(*resolved, Kind::Input);
        }
        other => panic!("unexpected error: {other}"),
    }
    let msg = err.to_string();
    assert!(msg.contains("Output") && msg.contains("Input"), "{msg}");
}

#[test]
fn abstract_link_accepts_inputs_and_outputs() {
    let (host, ids) = host_with(vec![
        record("in", &["INPS_DataType"]),
        record("out", &["OUTS_DataType"]),
        record("tool", &["TOOLS_Name"]),
    ]);
    let resolver = Resolver::new(host);
    assert!(matches!(resolver.resolve::<Link>(ids[0]), Ok(Link::Input(_))));
    assert!(matches!(resolver.resolve::<Link>(ids[1]), Ok(Link::Output(_))));
    let err = resolver.resolve::<Link>(ids[2]).unwrap_err();
    assert!(matches!(
        err,
        FuError::TypeMismatch {
            requested: Kind::Link,
            resolved: Kind::Tool
        }
    ));
}

#[test]
fn wrapped_candidate_passes_through_unchanged() {
    let (host, ids) = host_with(vec![record("Merge1", &["TOOLS_Name"])]);
    let resolver = Resolver::new(host.clone());
    let tool: Tool = resolver.resolve(ids[0]).unwrap();
    let before = host.calls().unwrap().len();

    let again: Tool = resolver.resolve(&tool).unwrap();
    assert!(again.handle().same_object(tool.handle()));
    let as_node = resolver
        .resolve_node(Kind::Object, Candidate::from(&tool))
        .unwrap();
    assert!(matches!(as_node, Node::Tool(_)));
    assert_eq!(host.calls().unwrap().len(), before);
}

#[test]
fn wrapped_candidate_of_wrong_kind_is_a_mismatch() {
    let (host, ids) = host_with(vec![record("Merge1", &["TOOLS_Name"])]);
    let resolver = Resolver::new(host);
    let tool: Tool = resolver.resolve(ids[0]).unwrap();
    let err = resolver.resolve::<Composition>(&tool).unwrap_err();
    assert!(matches!(
        err,
        FuError::TypeMismatch {
            requested: Kind::Composition,
            resolved: Kind::Tool
        }
    ));
}

#[test]
fn resolution_is_idempotent() {
    let (host, ids) = host_with(vec![record("c", &["COMPS_FileName"])]);
    let resolver = Resolver::new(host);
    let a = resolver
        .resolve_node(Kind::Object, Candidate::Handle(ids[0]))
        .unwrap();
    let b = resolver
        .resolve_node(Kind::Object, Candidate::Handle(ids[0]))
        .unwrap();
    assert_eq!(a.kind(), b.kind());
    assert!(a.handle().same_object(b.handle()));
}

#[test]
fn absent_candidate_uses_ambient_default() {
    let (host, ids) = host_with(vec![record("Fusion", &["FUSIONS_Version"])]);
    let defaults = AmbientSlots {
        application: Some(ids[0]),
        composition: None,
    };
    let resolver = Resolver::new(host).with_defaults(Arc::new(defaults));
    let app: Application = resolver.resolve(Candidate::Absent).unwrap();
    assert_eq!(app.handle().id(), ids[0]);

    let via_nil: Application = resolver.resolve(Value::Nil).unwrap();
    assert_eq!(via_nil.handle().id(), ids[0]);
}

#[test]
fn empty_default_slot_is_no_default_available() {
    let (host, _) = host_with(vec![]);
    let resolver = Resolver::new(host.clone()).with_defaults(Arc::new(AmbientSlots::default()));
    let err = resolver.resolve::<Composition>(Candidate::Absent).unwrap_err();
    assert!(matches!(
        err,
        FuError::NoDefaultAvailable {
            requested: Kind::Composition
        }
    ));

    let bare = Resolver::new(host);
    let err = bare.resolve::<Application>(Candidate::Absent).unwrap_err();
    assert!(matches!(err, FuError::NoDefaultAvailable { .. }));
}

#[test]
fn kinds_without_slot_are_missing_reference() {
    let (host, _) = host_with(vec![]);
    let resolver = Resolver::new(host).with_defaults(Arc::new(AmbientSlots::default()));
    for kind in [Kind::Tool, Kind::Input, Kind::Object, Kind::Image] {
        let err = resolver.resolve_node(kind, Candidate::Absent).unwrap_err();
        assert!(
            matches!(err, FuError::MissingReference { requested } if requested == kind),
            "{kind}: {err}"
        );
    }
}

#[test]
fn default_slot_result_is_still_type_checked() {
    let (host, ids) = host_with(vec![record("Blur1", &["TOOLS_Name"])]);
    let defaults = AmbientSlots {
        composition: Some(ids[0]),
        application: None,
    };
    let resolver = Resolver::new(host).with_defaults(Arc::new(defaults));
    let err = resolver.resolve::<Composition>(Candidate::Absent).unwrap_err();
    assert!(matches!(err, FuError::TypeMismatch { .. }));
}

#[test]
fn non_handle_values_are_invalid_handle_type() {
    let (host, _) = host_with(vec![]);
    let resolver = Resolver::new(host);
    for v in [Value::from("Blur1"), Value::Number(3.0), Value::list([])] {
        let err = resolver
            .resolve_node(Kind::Object, Candidate::Value(v))
            .unwrap_err();
        assert!(matches!(err, FuError::InvalidHandleType { .. }), "{err}");
    }
}

#[test]
fn unknown_handle_ids_are_invalid_handle_type() {
    let (host, _) = host_with(vec![]);
    let err = Resolver::new(host)
        .resolve_node(Kind::Object, Candidate::Handle(HandleId(999)))
        .unwrap_err();
    assert!(matches!(err, FuError::InvalidHandleType { .. }));
}

#[test]
fn resolving_makes_no_method_calls() {
    let (host, ids) = host_with(vec![
        record("t", &["TOOLS_Name"]),
        record("Image 2x2", &[]),
    ]);
    let resolver = Resolver::new(host.clone());
    let _: Tool = resolver.resolve(ids[0]).unwrap();
    let _: Image = resolver.resolve(ids[1]).unwrap();
    assert!(host.calls().unwrap().is_empty());
}

#[test]
fn node_downcast_and_input_wrapper() {
    let (host, ids) = host_with(vec![record("in", &["INPS_ID", "INPS_DataType"])]);
    let node = Resolver::new(host)
        .resolve_node(Kind::Link, Candidate::Handle(ids[0]))
        .unwrap();
    assert!(node.clone().downcast::<Output>().is_none());
    assert!(node.downcast::<Input>().is_some());
}
