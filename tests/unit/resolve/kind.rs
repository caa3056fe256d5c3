use super::*;

#[test]
fn subtype_relation_follows_hierarchy() {
    assert!(Kind::Input.is_subtype_of(Kind::Link));
    assert!(Kind::Output.is_subtype_of(Kind::Object));
    assert!(Kind::Image.is_subtype_of(Kind::Parameter));
    assert!(Kind::Tool.is_subtype_of(Kind::Tool));
    assert!(!Kind::Composition.is_subtype_of(Kind::Tool));
    assert!(!Kind::Link.is_subtype_of(Kind::Input));
    assert!(!Kind::Image.is_subtype_of(Kind::Link));
}

#[test]
fn every_prefix_maps_to_its_kind() {
    let cases = [
        ("COMPS_FileName", Kind::Composition),
        ("TOOLS_Name", Kind::Tool),
        ("INPS_DataType", Kind::Input),
        ("OUTS_DataType", Kind::Output),
        ("VIEWS_Name", Kind::FlowView),
        ("FUSIONS_Version", Kind::Application),
        ("REGS_Name", Kind::Registry),
    ];
    for (name, kind) in cases {
        assert_eq!(Kind::from_attr_names([name]), Some(kind), "{name}");
    }
}

#[test]
fn prefix_inference_ignores_enumeration_order() {
    let a = ["TOOLB_Visible", "TOOLS_Name", "XTRA_Unrelated"];
    let b = ["XTRA_Unrelated", "TOOLS_Name", "TOOLB_Visible"];
    assert_eq!(Kind::from_attr_names(a), Some(Kind::Tool));
    assert_eq!(Kind::from_attr_names(b), Some(Kind::Tool));
}

#[test]
fn unknown_prefixes_stay_undetermined() {
    assert_eq!(Kind::from_attr_names(["XYZ_Foo", "ABC_Bar"]), None);
    assert_eq!(Kind::from_attr_names(std::iter::empty::<&str>()), None);
}

#[test]
fn label_fallback_uses_leading_token() {
    assert_eq!(Kind::from_label("Image 512x256"), Some(Kind::Image));
    assert_eq!(Kind::from_label("  Image"), Some(Kind::Image));
    assert_eq!(Kind::from_label("Images 3"), None);
    assert_eq!(Kind::from_label(""), None);
}

#[test]
fn only_composition_and_application_have_default_slots() {
    for kind in Kind::ALL {
        let has_slot = kind.default_slot().is_some();
        assert_eq!(
            has_slot,
            matches!(kind, Kind::Composition | Kind::Application),
            "{kind}"
        );
    }
}

#[test]
fn names_round_trip_case_insensitively() {
    for kind in Kind::ALL {
        assert_eq!(Kind::from_name(&kind.name().to_lowercase()), Some(kind));
    }
    assert_eq!(Kind::from_name("widget"), None);
}
