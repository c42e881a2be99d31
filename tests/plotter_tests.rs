use kicad2skin::{
    error::Error,
    geometry::Point,
    plotter::{Attributes, Plotter, TextItem},
    skin_plotter::SkinPlotter,
    svg_plotter::{PageInfo, SvgPlotter},
};

#[test]
fn test_groups_must_balance() {
    let mut plotter = SkinPlotter::new(false);
    plotter.start_plot();
    let result = plotter.end_group();
    assert!(
        matches!(result, Err(Error::UnbalancedGroup(_))),
        "end_group with no open group should fail: {:?}",
        result
    );

    plotter
        .start_group(&Attributes::new().with("type", "lib:R"), None)
        .expect("open group");
    let result = plotter.end_plot();
    assert!(
        matches!(result, Err(Error::UnbalancedGroup(_))),
        "end_plot with an open group should fail: {:?}",
        result
    );

    assert!(plotter.end_group().is_ok());
    assert!(plotter.end_plot().is_ok());
    assert_eq!(plotter.context().depth(), 0);
}

#[test]
fn test_skin_group_attributes_are_namespaced_in_order() {
    let mut plotter = SkinPlotter::new(false);
    let attrs = Attributes::new()
        .with("type", "device:R")
        .with_num("width", 12.5)
        .with_num("height", 3.0);
    plotter.start_group(&attrs, None).expect("open group");
    plotter.end_group().expect("close group");

    let svg = plotter.into_output();
    assert!(
        svg.contains(r#"<g s:type="device:R" s:width="12.5" s:height="3">"#),
        "unexpected group markup: {}",
        svg
    );
}

#[test]
fn test_svg_group_attributes_are_plain() {
    let mut plotter = SvgPlotter::new(PageInfo::default(), false);
    let attrs = Attributes::new().with("name", "1").with("class", "part_pad");
    plotter.start_group(&attrs, Some("translate(1 2)")).expect("open group");
    plotter.end_group().expect("close group");

    let svg = plotter.into_output();
    assert!(
        svg.contains(r#"<g transform="translate(1 2)" name="1" class="part_pad">"#),
        "unexpected group markup: {}",
        svg
    );
}

#[test]
fn test_invalid_attribute_name_is_rejected() {
    let mut plotter = SvgPlotter::new(PageInfo::default(), false);
    let result = plotter.emit_tag("g", &Attributes::new().with("1bad", "x"));
    assert!(
        matches!(result, Err(Error::InvalidName(ref name)) if name == "1bad"),
        "attribute names must be XML names: {:?}",
        result
    );
}

#[test]
fn test_text_is_escaped() {
    let mut plotter = SkinPlotter::new(false);
    plotter.label(&TextItem::new(Point::new(1.0, 2.0), "A<B&C", 10.0));
    plotter
        .emit_tag("g", &Attributes::new().with("s:pid", "\"1\""))
        .expect("emit tag");

    let svg = plotter.into_output();
    assert!(svg.contains(">A&lt;B&amp;C</text>"), "text not escaped: {}", svg);
    assert!(svg.contains(r#"s:pid="&quot;1&quot;""#), "attribute not escaped: {}", svg);
}

#[test]
fn test_empty_label_and_value_become_placeholders() {
    let mut plotter = SkinPlotter::new(false);
    plotter.label(&TextItem::new(Point::ZERO, "", 10.0));
    plotter.value(&TextItem::new(Point::ZERO, "", 10.0));
    plotter.value(&TextItem::new(Point::ZERO, "4.7k", 10.0));

    let svg = plotter.into_output();
    assert!(
        svg.contains(r#"<text class="nodelabel $cell_id" style="font-size:10px;" x="0" y="0" s:attribute="ref"></text>"#),
        "missing reference placeholder: {}",
        svg
    );
    assert!(
        svg.contains(r#"class="nodevalue $cell_id" style="font-size:10px;" x="0" y="0" s:attribute="value">"#),
        "missing value placeholder: {}",
        svg
    );
    assert_eq!(svg.matches("s:attribute").count(), 2, "non-empty text is not a placeholder");
}

#[test]
fn test_vertical_text_rotates_about_anchor() {
    let mut plotter = SkinPlotter::new(false);
    let item = TextItem {
        angle: 90.0,
        ..TextItem::new(Point::new(10.0, 20.0), "U1", 15.0)
    };
    plotter.label(&item);

    let svg = plotter.into_output();
    assert!(
        svg.contains(r#"transform="rotate(-90, 10, 20)" x="10" y="20""#),
        "missing rotation: {}",
        svg
    );
}

#[test]
fn test_multiline_text_uses_tspans() {
    let mut plotter = SvgPlotter::new(PageInfo::default(), false);
    let item = TextItem {
        multiline: true,
        ..TextItem::new(Point::ZERO, "line one\nline two", 1.0)
    };
    plotter.text(&item);

    let svg = plotter.into_output();
    assert!(svg.contains(r#"<tspan x="0" dy="0">line one</tspan>"#), "{}", svg);
    assert!(svg.contains(r#"<tspan x="0" dy="1.62">line two</tspan>"#), "{}", svg);
}

#[test]
fn test_standalone_wraps_document() {
    let page = PageInfo {
        width: 4.0,
        height: 2.5,
    };
    let mut plotter = SvgPlotter::new(page, true);
    plotter.start_plot();
    plotter.end_plot().expect("balanced");
    let svg = plotter.into_output();
    assert!(svg.starts_with("<svg "), "{}", svg);
    assert!(svg.contains(r#"width="4mm" height="2.5mm" viewBox="0 0 4 2.5""#), "{}", svg);
    assert!(svg.trim_end().ends_with("</svg>"), "{}", svg);

    let mut plotter = SkinPlotter::new(false);
    plotter.start_plot();
    plotter.end_plot().expect("balanced");
    assert!(plotter.output().is_empty(), "fragments carry no document wrapper");
}
