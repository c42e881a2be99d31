use kicad2skin::{
    config::RenderConfig,
    error::Error,
    geometry::Rotation,
    importer::{find_symbol, load_footprint, load_footprint_from_path, load_symbol_library},
    kicad_models::{Footprint, SymbolLibrary},
    layers::{LayerSet, PcbLayer},
    metrics::NoMetrics,
    render_footprint, render_symbol_with_metrics,
};

const LIBRARY: &str = r#"{
    "name": "device",
    "symbols": [
        {
            "name": "R",
            "reference": {"text": "R", "pos": [0, 10], "size": 50},
            "value": {"text": "10k", "pos": [0, -10], "size": 50},
            "items": [
                {"type": "rectangle", "start": [-5, -5], "end": [5, 5], "width": 0}
            ],
            "pins": [
                {"number": "1", "name": "~", "pos": [-10, 0], "length": 10, "orientation": "L"},
                {"number": "2", "name": "~", "pos": [10, 0], "length": 10, "orientation": "R"}
            ]
        },
        {
            "name": "TOKENS",
            "reference": {"text": "U", "pos": [0, 0], "size": 50, "visible": false},
            "value": {"text": "%V", "pos": [0, 0], "size": 50},
            "items": [
                {"type": "text", "text": "%R", "pos": [0, 20], "size": 40}
            ]
        },
        {
            "name": "DUAL",
            "unit_count": 2,
            "reference": {"text": "U", "pos": [0, 0], "size": 50},
            "value": {"text": "DUAL", "pos": [0, 0], "size": 50},
            "pins": [
                {"number": "1", "pos": [0, -20], "length": 10, "orientation": "U", "unit": 1},
                {"number": "8", "pos": [0, 20], "length": 10, "orientation": "D", "unit": 0, "visible": false},
                {"number": "5", "pos": [20, 0], "length": 10, "orientation": "L", "unit": 2}
            ]
        }
    ]
}"#;

const FOOTPRINT: &str = r#"{
    "name": "R_0805",
    "reference": {"kind": "reference", "text": "REF**", "pos": [0, 0], "size": [1, 1], "layer": "F.SilkS"},
    "value": {"kind": "value", "text": "R_0805", "pos": [0, 1], "size": [1, 1], "layer": "F.Fab"},
    "graphics": [
        {"type": "edge", "layer": "F.SilkS", "width": 0.1, "shape": "segment", "start": [0, 0], "end": [3, 0]},
        {"type": "edge", "layer": "B.SilkS", "width": 0.1, "shape": "segment", "start": [0, 1], "end": [3, 1]},
        {"type": "text", "text": "%V", "pos": [1, 1], "size": [0.5, 0.5], "layer": "F.Fab"}
    ],
    "pads": [
        {"name": "1", "pos": [1, 0.5], "size": [1, 1], "shape": "circle", "drill_size": [0.5, 0.5], "layers": ["F.Cu", "B.Cu"]}
    ]
}"#;

fn library() -> SymbolLibrary {
    load_symbol_library(LIBRARY).expect("valid library json")
}

fn footprint() -> Footprint {
    load_footprint(FOOTPRINT).expect("valid footprint json")
}

#[test]
fn test_two_pin_symbol_end_to_end() {
    let library = library();
    let symbol = find_symbol(&library, "R").expect("symbol present");
    let config = RenderConfig::default();

    let render = render_symbol_with_metrics(&library.name, symbol, &config, &NoMetrics);
    assert!(render.is_ok(), "render failed: {:?}", render.err());
    let render = render.unwrap();

    let json = render.to_json().expect("serializable envelope");
    assert!(
        json.contains(r#""port_orientation":{"1":"LEFT","2":"RIGHT"}"#),
        "unexpected port map: {}",
        json
    );

    let svg = &render.svg;
    assert_eq!(svg.matches("s:type=").count(), 1, "exactly one root group: {}", svg);
    assert!(
        svg.contains(r#"<g s:type="device:R" s:width="40" s:height="10">"#),
        "unexpected root group: {}",
        svg
    );
    assert!(svg.contains(r#"<s:alias val="device:R"/>"#), "missing alias: {}", svg);
    assert!(
        svg.contains(r#"<g s:pid="1" s:position="right" s:x="10" s:y="5"/>"#),
        "pin 1 marker: {}",
        svg
    );
    assert!(
        svg.contains(r#"<g s:pid="2" s:position="left" s:x="30" s:y="5"/>"#),
        "pin 2 marker: {}",
        svg
    );
    assert_eq!(
        svg.matches("<g").count(),
        svg.matches("</g>").count() + 2,
        "every group closes; markers are self-closing"
    );
}

#[test]
fn test_rotation_reclassifies_ports() {
    let library = library();
    let symbol = find_symbol(&library, "R").expect("symbol present");
    let config = RenderConfig {
        rotation: Rotation::R90,
        ..RenderConfig::default()
    };

    let render = render_symbol_with_metrics(&library.name, symbol, &config, &NoMetrics)
        .expect("render at 90 degrees");
    let ports: Vec<String> = render
        .port_orientation
        .values()
        .map(|o| serde_json::to_string(o).expect("serializable"))
        .collect();
    assert_eq!(ports, [r#""DOWN""#, r#""UP""#]);
    assert!(
        render.svg.contains(r#"s:width="10" s:height="40""#),
        "bounds follow the rotation: {}",
        render.svg
    );
}

#[test]
fn test_value_override_replaces_token() {
    let library = library();
    let symbol = find_symbol(&library, "TOKENS").expect("symbol present");
    let config = RenderConfig {
        override_value: Some("4.7k".to_string()),
        override_reference: Some("U7".to_string()),
        ..RenderConfig::default()
    };

    let svg = render_symbol_with_metrics(&library.name, symbol, &config, &NoMetrics)
        .expect("render with overrides")
        .svg;
    assert!(svg.contains(">4.7k</text>"), "value not substituted: {}", svg);
    assert!(svg.contains(">U7</text>"), "inline reference token not substituted: {}", svg);
    assert!(!svg.contains("%V"), "token leaked: {}", svg);
    assert!(!svg.contains("s:attribute"), "nothing left to bind: {}", svg);
}

#[test]
fn test_no_override_keeps_field_text() {
    let library = library();
    let config = RenderConfig::default();

    let resistor = find_symbol(&library, "R").expect("symbol present");
    let svg = render_symbol_with_metrics(&library.name, resistor, &config, &NoMetrics)
        .expect("render")
        .svg;
    assert!(svg.contains(r#"class="nodevalue $cell_id""#), "{}", svg);
    assert!(svg.contains(">10k</text>"), "value text changed: {}", svg);
    assert!(svg.contains(">R</text>"), "reference text changed: {}", svg);

    let tokens = find_symbol(&library, "TOKENS").expect("symbol present");
    let svg = render_symbol_with_metrics(&library.name, tokens, &config, &NoMetrics)
        .expect("render")
        .svg;
    assert!(svg.contains(">%V</text>"), "field text is emitted as is: {}", svg);
    assert!(
        svg.contains(r#"s:attribute="ref"></text>"#),
        "unresolved inline token becomes a placeholder: {}",
        svg
    );
}

#[test]
fn test_unit_filter_and_hidden_pins() {
    let library = library();
    let symbol = find_symbol(&library, "DUAL").expect("symbol present");

    let render = render_symbol_with_metrics(&library.name, symbol, &RenderConfig::default(), &NoMetrics)
        .expect("render unit 1");
    let pins: Vec<&str> = render.port_orientation.keys().map(String::as_str).collect();
    assert_eq!(pins, ["1", "8"], "unit 2 pins are filtered, hidden pins kept");
    assert!(render.svg.contains(r#"s:pid="8""#), "hidden pin still gets a marker");

    let config = RenderConfig {
        unit: 2,
        ..RenderConfig::default()
    };
    let render = render_symbol_with_metrics(&library.name, symbol, &config, &NoMetrics)
        .expect("render unit 2");
    let pins: Vec<&str> = render.port_orientation.keys().map(String::as_str).collect();
    assert_eq!(pins, ["8", "5"]);

    let config = RenderConfig {
        unit: 3,
        ..RenderConfig::default()
    };
    let result = render_symbol_with_metrics(&library.name, symbol, &config, &NoMetrics);
    assert!(
        matches!(result, Err(Error::InvalidConfig(_))),
        "unit 3 does not exist: {:?}",
        result.err()
    );
}

#[test]
fn test_missing_device_is_not_found() {
    let library = library();
    let result = find_symbol(&library, "NOPE");
    assert!(
        matches!(result, Err(Error::NotFound(_))),
        "lookup should fail: {:?}",
        result.err()
    );
}

#[test]
fn test_footprint_full_layer_set_without_overrides() {
    let render = render_footprint(&footprint(), &RenderConfig::default());
    assert!(render.is_ok(), "render failed: {:?}", render.err());
    let render = render.unwrap();

    assert!(render.svg.contains(r#"d="M0 0 L3 0""#), "front silk edge: {}", render.svg);
    assert!(render.svg.contains(r#"d="M0 1 L3 1""#), "back silk edge: {}", render.svg);
    assert!(render.svg.contains(">REF**</text>"), "{}", render.svg);
    assert_eq!(render.page.width, 3.0);
    assert_eq!(render.page.height, 1.0);
}

#[test]
fn test_reference_override_trims_layers() {
    let config = RenderConfig {
        override_reference: Some("R7".to_string()),
        ..RenderConfig::default()
    };
    let svg = render_footprint(&footprint(), &config)
        .expect("render with reference override")
        .svg;

    assert!(svg.contains(r#"d="M0 0 L3 0""#), "front silk edge kept: {}", svg);
    assert!(!svg.contains(r#"d="M0 1 L3 1""#), "back silk edge trimmed: {}", svg);
    assert!(svg.contains(r#"class="reference $cell_id""#), "{}", svg);
    assert!(svg.contains(">R7</text>"), "reference not substituted: {}", svg);
    assert!(
        svg.contains(r#"data-attribute="value""#),
        "value token without override stays a placeholder: {}",
        svg
    );
}

#[test]
fn test_pad_then_drill_overlay() {
    let svg = render_footprint(&footprint(), &RenderConfig::default())
        .expect("render")
        .svg;

    let pad = svg
        .find(r#"<g name="1" class="part_pad">"#)
        .expect("pad group present");
    let body = svg
        .find(r##"<circle cx="1" cy="0.5" r="0.5" fill="#C2C200" stroke="none"/>"##)
        .expect("yellow pad body");
    let drill = svg
        .find(r##"<circle cx="1" cy="0.5" r="0.25" fill="#FFFFFF" stroke="none"/>"##)
        .expect("white drill mark");
    let close = svg[body..].find("</g>").map(|i| body + i).expect("pad group closed");
    assert!(pad < body && body < close && close < drill, "drill drawn over the pad: {}", svg);
}

#[test]
fn test_footprint_label_and_value_carry_cell_id() {
    let config = RenderConfig {
        override_value: Some("4.7k".to_string()),
        ..RenderConfig::default()
    };
    let svg = render_footprint(&footprint(), &config)
        .expect("render with value override")
        .svg;

    assert!(svg.contains(r#"<text class="reference $cell_id""#), "reference class: {}", svg);
    assert!(svg.contains(r#"<text class="value $cell_id""#), "value class: {}", svg);
    assert!(svg.contains(">4.7k</text>"), "value not substituted: {}", svg);
}

#[test]
fn test_front_assembly_layers() {
    let layers = LayerSet::front_assembly();
    assert!(!layers.is_empty());
    let names: Vec<&str> = layers.iter().map(PcbLayer::name).collect();
    assert_eq!(
        names,
        ["F.Cu", "F.Adhes", "F.Paste", "F.SilkS", "Dwgs.User", "Edge.Cuts", "F.Fab"]
    );
    assert!(!layers.contains(PcbLayer::BSilkS), "back silk is not part of the assembly view");
    assert!(LayerSet::new(Vec::<PcbLayer>::new()).is_empty());
}

#[test]
fn test_load_footprint_from_path() {
    let path = std::env::temp_dir().join("kicad2skin_render_tests_r0805.json");
    std::fs::write(&path, FOOTPRINT).expect("write fixture");
    let loaded = load_footprint_from_path(&path);
    let _ = std::fs::remove_file(&path);

    let loaded = loaded.expect("footprint loads from disk");
    assert_eq!(loaded.name, "R_0805");
    assert_eq!(loaded.pads.len(), 1);

    let missing = load_footprint_from_path(&path);
    assert!(matches!(missing, Err(Error::IoError(_))), "missing file: {:?}", missing.err());
}
