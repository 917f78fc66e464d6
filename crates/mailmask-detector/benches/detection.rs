use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use mailmask_core::NodeId;
use mailmask_detector::{DetectionPipeline, EmailInputDetector, RuleEvaluator};
use mailmask_dom::{Document, HtmlParser};

/// Build a signup page with `forms` forms of mixed inputs.
fn create_page(forms: usize) -> Document {
    let mut html = String::from("<html><body>");
    for i in 0..forms {
        html.push_str(&format!(
            r#"<form id="f{i}">
                 <label for="user{i}">Username</label><input id="user{i}" name="user">
                 <label for="mail{i}">Email</label><input id="mail{i}" type="text">
                 <input type="email" name="backup{i}">
                 <input name="contact{i}" placeholder="Your e-mail address">
                 <input type="password" name="pw{i}">
                 <input type="hidden" name="email">
               </form>"#
        ));
    }
    html.push_str("</body></html>");
    HtmlParser::new().parse(&html)
}

fn bench_lazy_detector(c: &mut Criterion) {
    let mut group = c.benchmark_group("email_input_detector");

    for forms in [1, 10, 100].iter() {
        let doc = create_page(*forms);
        let detector = EmailInputDetector::new();

        group.bench_with_input(BenchmarkId::from_parameter(forms), &doc, |b, d| {
            b.iter(|| {
                let count = detector.iter(black_box(d), NodeId::root()).count();
                black_box(count);
            });
        });
    }

    group.finish();
}

/// One form with `fields` inputs, each with its own `for` label.
fn create_labeled_form(fields: usize) -> Document {
    let mut html = String::from("<form>");
    for i in 0..fields {
        html.push_str(&format!(
            r#"<label for="f{i}">Field {i}</label><input id="f{i}" name="f{i}">"#
        ));
    }
    html.push_str("</form>");
    HtmlParser::new().parse(&html)
}

fn bench_labeled_form(c: &mut Criterion) {
    let mut group = c.benchmark_group("labeled_form");
    let detector = EmailInputDetector::new();

    for fields in [100, 400, 1600].iter() {
        let doc = create_labeled_form(*fields);

        // Fresh clones so every iteration builds the label links again
        group.bench_with_input(BenchmarkId::from_parameter(fields), &doc, |b, d| {
            b.iter_batched(
                || d.clone(),
                |doc| black_box(detector.iter(&doc, NodeId::root()).count()),
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let doc = create_page(10);
    let pipeline = DetectionPipeline::email_inputs();

    c.bench_function("pipeline_10_forms", |b| {
        b.iter(|| {
            let fields = pipeline.detect(black_box(&doc), NodeId::root());
            black_box(fields);
        });
    });
}

fn bench_rule_evaluator(c: &mut Criterion) {
    let doc = create_page(1);
    let evaluator = RuleEvaluator::new();
    let node = doc.find_by_id("mail0").unwrap_or(NodeId::root());

    c.bench_function("rule_evaluator_score", |b| {
        b.iter(|| {
            let score = evaluator.score(black_box(&doc), black_box(node));
            black_box(score);
        });
    });
}

fn bench_parse(c: &mut Criterion) {
    let html = r#"<form><label for="e">Email</label><input id="e"></form>"#.repeat(50);
    let parser = HtmlParser::new();

    c.bench_function("parse_50_forms", |b| {
        b.iter(|| {
            let doc = parser.parse(black_box(&html));
            black_box(doc);
        });
    });
}

criterion_group!(
    benches,
    bench_lazy_detector,
    bench_labeled_form,
    bench_pipeline,
    bench_rule_evaluator,
    bench_parse
);
criterion_main!(benches);
