//! End-to-end detection scenarios over parsed markup.

use mailmask_core::{Confidence, DetectionReason, NodeId};
use mailmask_detector::{DetectionPipeline, EmailInputDetector, RuleEvaluator, BIAS};
use mailmask_dom::{Document, HtmlParser};

fn parse(html: &str) -> Document {
    HtmlParser::new().parse(html)
}

fn detect_ids(doc: &Document, root: NodeId) -> Vec<String> {
    EmailInputDetector::new()
        .iter(doc, root)
        .map(|f| doc.attr_or_empty(f.node, "id").to_string())
        .collect()
}

#[test]
fn explicit_email_always_reported() {
    let doc = parse(
        r#"<form>
             <input id="x" type="email" name="username" style="display:none">
           </form>"#,
    );
    let fields: Vec<_> = EmailInputDetector::new().iter(&doc, NodeId::root()).collect();

    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].reason, DetectionReason::ExplicitType);
    assert_eq!(fields[0].confidence, Confidence::High);
    assert_eq!(fields[0].descriptor.input_type.as_deref(), Some("email"));
}

#[test]
fn exact_attribute_values_clear_threshold() {
    let doc = parse(
        r#"<input id="email"><input id="b" name="E-Mail"><input id="c" autocomplete="EMAIL">"#,
    );
    assert_eq!(detect_ids(&doc, NodeId::root()), ["email", "b", "c"]);
}

#[test]
fn no_signal_scores_bias_and_is_excluded() {
    let doc = parse(r#"<input type="text" id="username">"#);
    let node = doc.find_by_id("username").unwrap();

    assert_eq!(RuleEvaluator::new().score(&doc, node), BIAS);
    assert!(detect_ids(&doc, NodeId::root()).is_empty());
}

#[test]
fn label_for_id_included() {
    let doc = parse(r#"<label for="addr">Email</label><input id="addr" type="text">"#);
    assert_eq!(detect_ids(&doc, NodeId::root()), ["addr"]);
}

#[test]
fn label_for_name_fallback_included() {
    let doc = parse(
        r#"<form><label for="addr">E-mail</label><input name="addr" class="field"></form>"#,
    );
    let fields: Vec<_> = EmailInputDetector::new().iter(&doc, NodeId::root()).collect();

    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].descriptor.name.as_deref(), Some("addr"));
    assert_eq!(fields[0].reason, DetectionReason::Scored);
}

#[test]
fn explicit_reported_before_scored() {
    let doc = parse(
        r#"<input type="email" id="x">
           <input type="text" id="y" placeholder="Your e-mail address">"#,
    );
    let fields: Vec<_> = EmailInputDetector::new().iter(&doc, NodeId::root()).collect();

    assert_eq!(fields.len(), 2);
    assert!(fields[0].is_explicit());
    assert_eq!(fields[1].reason, DetectionReason::Scored);
    assert_eq!(doc.attr(fields[1].node, "id"), Some("y"));
}

#[test]
fn scored_fields_after_explicit_even_if_earlier_in_document() {
    let doc = parse(
        r#"<input type="text" id="y" placeholder="email"><input type="email" id="x">"#,
    );
    assert_eq!(detect_ids(&doc, NodeId::root()), ["x", "y"]);
}

#[test]
fn unrelated_text_input_reports_nothing() {
    let doc = parse(r#"<form><input type="text" id="username"></form>"#);
    assert!(detect_ids(&doc, NodeId::root()).is_empty());
}

#[test]
fn hidden_text_inputs_not_reported() {
    let doc = parse(
        r#"<input id="a" name="email" hidden>
           <div style="visibility: hidden"><input id="b" name="email"></div>
           <template><input id="c" name="email"></template>
           <input id="d" name="email" type="hidden">"#,
    );
    assert!(detect_ids(&doc, NodeId::root()).is_empty());
}

#[test]
fn other_input_types_not_scored() {
    let doc = parse(
        r#"<input id="p" type="password" name="email"><input id="s" type="search" name="email">
           <textarea id="t" name="email"></textarea>"#,
    );
    assert!(detect_ids(&doc, NodeId::root()).is_empty());
}

#[test]
fn repeated_passes_agree() {
    let doc = parse(
        r#"<form id="signup">
             <label>Work email <input id="w"></label>
             <input id="x" type="email">
             <input id="n" name="name" placeholder="Full name">
           </form>"#,
    );
    let form = doc.find_by_id("signup").unwrap();
    let detector = EmailInputDetector::new();

    let first: Vec<_> = detector.iter(&doc, form).collect();
    let second: Vec<_> = detector.iter(&doc, form).collect();
    assert_eq!(first, second);
    assert_eq!(detect_ids(&doc, form), ["x", "w"]);
}

#[test]
fn root_scoping_and_exclusion() {
    let doc = parse(
        r#"<input id="outer" name="email">
           <form id="f"><input id="inner" name="email"></form>"#,
    );
    let form = doc.find_by_id("f").unwrap();
    assert_eq!(detect_ids(&doc, form), ["inner"]);

    let inner = doc.find_by_id("inner").unwrap();
    assert!(detect_ids(&doc, inner).is_empty());
}

#[test]
fn pipeline_agrees_with_lazy_detector() {
    let doc = parse(
        r#"<form>
             <input type="EMAIL" id="a">
             <input id="b" aria-label="Email address">
             <label for="c">Contact e-mail</label><input id="c" type="">
             <input id="d" placeholder="Phone">
           </form>"#,
    );
    let lazy: Vec<_> = EmailInputDetector::new().iter(&doc, NodeId::root()).collect();
    let eager = DetectionPipeline::email_inputs().detect(&doc, NodeId::root());
    assert_eq!(lazy, eager);
    assert_eq!(lazy.len(), 3);
}

#[test]
fn detection_sees_appended_fragment() {
    let parser = HtmlParser::new();
    let mut doc = parser.parse(r#"<div id="slot"></div>"#);
    let slot = doc.find_by_id("slot").unwrap();
    assert!(detect_ids(&doc, NodeId::root()).is_empty());

    parser
        .append_fragment(&mut doc, slot, r#"<form><input id="late" name="email"></form>"#)
        .unwrap();
    assert_eq!(detect_ids(&doc, NodeId::root()), ["late"]);
}

#[test]
fn large_labeled_form() {
    let fields = 2_000;
    let mut html = String::from("<form>");
    for i in 0..fields {
        let (target, text) = match i % 10 {
            0 => (format!("f{i}"), "Email"),
            5 => (format!("n{i}"), "E-mail"),
            _ => (format!("f{i}"), "Field"),
        };
        html.push_str(&format!(
            r#"<label for="{target}">{text} {i}</label><input id="f{i}" name="n{i}">"#
        ));
    }
    html.push_str("</form>");
    let doc = parse(&html);

    let ids = detect_ids(&doc, NodeId::root());
    assert_eq!(ids.len(), fields / 5);
    assert_eq!(ids[0], "f0");
    assert_eq!(ids[1], "f5");

    let eager = DetectionPipeline::email_inputs().detect(&doc, NodeId::root());
    assert_eq!(eager.len(), ids.len());
}
