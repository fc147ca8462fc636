//! End-to-end generation runs on hand-built trees

use std::rc::Rc;

use cssmap_ast::{Comment, Declaration, Input, Location, Root, Rule, Source};
use cssmap_codec::SourceMapConsumer;
use cssmap_generator::{Annotation, GenerationContext, MapOptions, MapSetting, generate};

fn color_rule(input: &Rc<Input>) -> Root {
    Root::new().append(
        Rule::new("a")
            .with_source(Source::new(input, Location::new(1, 1), Location::new(1, 12)))
            .append(Declaration::new("color", "red")),
    )
}

fn external() -> MapSetting {
    MapSetting::Options(MapOptions {
        inline: Some(false),
        ..MapOptions::default()
    })
}

#[test]
fn test_rule_boundaries_with_default_names() {
    let input = Rc::new(Input::new("a{color:red}", "/work/from.css"));
    let mut root = color_rule(&input);
    let ctx = GenerationContext::new().with_cwd("/work").with_map(external());

    let out = generate(&mut root, &ctx).unwrap();
    assert_eq!(out.css, "a{color:red}\n/*# sourceMappingURL=to.css.map */");

    let map = out.map.unwrap();
    insta::assert_snapshot!(
        map.to_json(),
        @r#"{"version":3,"sources":["from.css"],"names":[],"mappings":"AAAA,YAAY","file":"to.css","sourcesContent":["a{color:red}"]}"#
    );
}

#[test]
fn test_text_only_without_map() {
    let input = Rc::new(Input::new("a{color:red}", "/work/a.css"));
    let mut root = color_rule(&input);
    let ctx = GenerationContext::new().with_cwd("/work");

    let out = generate(&mut root, &ctx).unwrap();
    assert_eq!(out.css, "a{color:red}");
    assert!(out.map.is_none());
}

#[test]
fn test_inline_without_annotation_is_text_only() {
    let input = Rc::new(Input::new("a{color:red}", "/work/a.css"));
    let mut root = color_rule(&input);
    let ctx = GenerationContext::new()
        .with_cwd("/work")
        .with_map(MapSetting::Options(MapOptions {
            inline: Some(true),
            annotation: Some(Annotation::Flag(false)),
            ..MapOptions::default()
        }));

    let out = generate(&mut root, &ctx).unwrap();
    assert_eq!(out.css, "a{color:red}");
    assert!(out.map.is_none());
}

#[test]
fn test_inline_map_decodes() {
    let input = Rc::new(Input::new("a{color:red}", "/work/a.css"));
    let mut root = color_rule(&input);
    let ctx = GenerationContext::new()
        .with_cwd("/work")
        .with_to("/work/out.css")
        .with_map(MapSetting::Flag(true));

    let out = generate(&mut root, &ctx).unwrap();
    assert!(out.map.is_none());

    let reparsed = Input::with_previous_map(out.css.clone(), "/work/out.css", None).unwrap();
    let prev = reparsed.map.expect("inline map is picked up");
    assert!(prev.is_inline());
    assert!(prev.has_annotation());

    let consumer = prev.consumer().unwrap();
    assert_eq!(consumer.file(), Some("out.css"));
    let found = consumer.original_position_for(1, 0).unwrap();
    assert_eq!((found.source.as_str(), found.line, found.column), ("a.css", 1, 0));
}

#[test]
fn test_repeated_runs_keep_one_annotation() {
    let input = Rc::new(Input::new("a{color:red}", "/work/a.css"));
    let mut root = color_rule(&input).append(Comment::new("# sourceMappingURL=stale.css.map"));
    let ctx = GenerationContext::new()
        .with_cwd("/work")
        .with_to("/work/out.css")
        .with_map(external());

    let first = generate(&mut root, &ctx).unwrap();
    let second = generate(&mut root, &ctx).unwrap();
    assert_eq!(first.css, "a{color:red}\n/*# sourceMappingURL=out.css.map */");
    assert_eq!(first.css, second.css);
    assert_eq!(second.css.matches("sourceMappingURL").count(), 1);
}

#[test]
fn test_custom_annotation_moves_sources() {
    let input = Rc::new(Input::new("a{color:red}", "/proj/src/a.css"));
    let mut root = color_rule(&input);
    let ctx = GenerationContext::new()
        .with_cwd("/proj")
        .with_to("/proj/dist/out.css")
        .with_map(MapSetting::Options(MapOptions {
            annotation: Some(Annotation::Path("maps/out.css.map".into())),
            ..MapOptions::default()
        }));

    let out = generate(&mut root, &ctx).unwrap();
    assert_eq!(out.css, "a{color:red}\n/*# sourceMappingURL=maps/out.css.map */");

    let map = out.map.unwrap();
    assert_eq!(map.file(), Some("../out.css"));
    assert_eq!(map.sources().collect::<Vec<_>>(), vec!["../../src/a.css"]);
}

#[test]
fn test_sources_relative_to_output_directory() {
    let input = Rc::new(Input::new("a{color:red}", "/proj/src/a.css"));
    let mut root = color_rule(&input);
    let ctx = GenerationContext::new()
        .with_cwd("/proj")
        .with_to("/proj/dist/out.css")
        .with_map(external());

    let out = generate(&mut root, &ctx).unwrap();
    let map = SourceMapConsumer::from_json(&out.map.unwrap().to_json()).unwrap();
    assert_eq!(map.sources(), ["../src/a.css"]);
    assert_eq!(map.file(), Some("out.css"));
    assert_eq!(map.source_content_for("../src/a.css"), Some("a{color:red}"));
}

#[test]
fn test_options_from_json() {
    let input = Rc::new(Input::new("a{color:red}", "/work/a.css"));
    let mut root = color_rule(&input);
    let mut ctx: GenerationContext = serde_json::from_str(
        r#"{"to": "/work/out.css", "map": {"inline": false, "sourcesContent": false}}"#,
    )
    .unwrap();
    ctx.cwd = Some("/work".into());

    let out = generate(&mut root, &ctx).unwrap();
    let raw = out.map.unwrap().to_raw();
    assert_eq!(raw.sources, vec!["a.css"]);
    assert!(raw.sources_content.is_none());
}
