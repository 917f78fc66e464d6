//! A parsed page and its detection passes.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use tracing::{debug, info};

use mailmask_core::{
    DetectedField, Error, FieldReport, InjectionSettings, NodeId, PageId, PageInfo, PassTrigger,
    Result,
};
use mailmask_detector::{DetectionPipeline, RuleEvaluator, ScoreBreakdown};
use mailmask_dom::{Document, HtmlParser};

/// Mutable page state, guarded by the page lock.
#[derive(Debug)]
struct PageState {
    document: Document,
    passes: usize,
    processed: usize,
    loaded: bool,
}

/// An open page.
///
/// Each marking pass adds the configured marker class to every field it
/// reports and skips fields that already carry it, so a field is reported
/// by at most one marking pass over the page's lifetime. Passes hold the
/// page lock for their whole run and never overlap.
pub struct Page {
    /// Page identifier
    id: PageId,

    /// Source URL supplied by the caller
    url: Option<String>,

    /// Marker class and mutation settings
    settings: InjectionSettings,

    /// Detectors run on every pass
    pipeline: DetectionPipeline,

    /// Parser for mutation fragments
    parser: HtmlParser,

    /// Page creation time
    created_at: SystemTime,

    /// Document and pass bookkeeping
    state: Mutex<PageState>,
}

impl Page {
    /// Parse `html` and run the script-load pass.
    pub fn open(
        html: &str,
        url: Option<String>,
        settings: InjectionSettings,
    ) -> Result<(Self, FieldReport)> {
        settings.validate()?;

        let parser = HtmlParser::new();
        let document = parser.parse(html);
        let id = PageId::new();
        info!(
            "Opening page: id={}, url={:?}, {} nodes",
            id,
            url,
            document.len()
        );

        let page = Self {
            id,
            url,
            settings,
            pipeline: DetectionPipeline::email_inputs(),
            parser,
            created_at: SystemTime::now(),
            state: Mutex::new(PageState {
                document,
                passes: 0,
                processed: 0,
                loaded: false,
            }),
        };

        let report = {
            let mut state = page.state();
            page.run_pass(&mut state, PassTrigger::ScriptLoad, vec![NodeId::root()])?
        };

        Ok((page, report))
    }

    /// Read an HTML file and open it as a page.
    pub fn open_file<P: AsRef<Path>>(
        path: P,
        settings: InjectionSettings,
    ) -> Result<(Self, FieldReport)> {
        let path = path.as_ref();
        let html = std::fs::read_to_string(path)?;
        Self::open(&html, Some(path.display().to_string()), settings)
    }

    /// Get the page ID.
    pub fn id(&self) -> &PageId {
        &self.id
    }

    /// Get the source URL.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Get the creation time.
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Get the marker class added to processed fields.
    pub fn marker_class(&self) -> &str {
        &self.settings.marker_class
    }

    /// Run the page-load pass. Allowed once per page.
    pub fn loaded(&self) -> Result<FieldReport> {
        let mut state = self.state();
        if state.loaded {
            return Err(Error::InvalidInput(format!(
                "page {} has already finished loading",
                self.id
            )));
        }
        state.loaded = true;

        self.run_pass(&mut state, PassTrigger::PageLoad, vec![NodeId::root()])
    }

    /// Insert an HTML fragment under `parent` and run a mutation pass.
    ///
    /// `parent` is a node reference (`node_12`, `12` or `#id`); the default
    /// is `<body>`, or the document root when there is none. The pass is
    /// scoped to the form enclosing the insertion point, else to the forms
    /// inside the fragment, else to `parent` itself. With mutation
    /// observation disabled the fragment is inserted and the report is empty.
    pub fn mutate(&self, parent: Option<&str>, html: &str) -> Result<FieldReport> {
        let mut state = self.state();
        let doc = &mut state.document;

        let parent = match parent {
            Some(reference) => doc.resolve(reference)?,
            None => doc
                .elements_by_tag(NodeId::root(), "body")
                .next()
                .unwrap_or(NodeId::root()),
        };

        let inserted = self.parser.append_fragment(doc, parent, html)?;
        debug!(
            "Page {}: inserted {} node(s) under {}",
            self.id,
            inserted.len(),
            parent
        );

        if !self.settings.observe_mutations {
            return Ok(self.report(PassTrigger::Mutation, Vec::new(), Vec::new(), 0));
        }

        let roots = mutation_roots(doc, parent, &inserted);
        self.run_pass(&mut state, PassTrigger::Mutation, roots)
    }

    /// Detect email inputs under `root` without marking them.
    pub fn detect(&self, root: Option<&str>) -> Result<FieldReport> {
        let state = self.state();
        let root = match root {
            Some(reference) => state.document.resolve(reference)?,
            None => NodeId::root(),
        };

        let fields = self.pipeline.detect(&state.document, root);
        debug!(
            "Page {}: manual detection under {} found {} field(s)",
            self.id,
            root,
            fields.len()
        );
        Ok(self.report(PassTrigger::Manual, vec![root], fields, 0))
    }

    /// Per-rule score breakdown for one element.
    pub fn explain(&self, element: &str) -> Result<ScoreBreakdown> {
        let state = self.state();
        let node = state.document.resolve(element)?;
        if !state.document.is_element(node) {
            return Err(Error::NotAnElement(node));
        }
        Ok(RuleEvaluator::new().explain(&state.document, node))
    }

    /// Whether the element carries the processed marker.
    pub fn is_processed(&self, element: &str) -> Result<bool> {
        let state = self.state();
        let node = state.document.resolve(element)?;
        Ok(state.document.has_class(node, &self.settings.marker_class))
    }

    /// Summary of the page.
    pub fn info(&self) -> PageInfo {
        let state = self.state();
        PageInfo {
            page_id: self.id,
            url: self.url.clone(),
            processed_fields: state.processed,
            passes: state.passes,
            loaded: state.loaded,
        }
    }

    fn state(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn run_pass(
        &self,
        state: &mut PageState,
        trigger: PassTrigger,
        roots: Vec<NodeId>,
    ) -> Result<FieldReport> {
        let marker = self.settings.marker_class.as_str();
        let found = self.pipeline.detect_roots(&state.document, &roots);

        let mut fields: Vec<DetectedField> = Vec::with_capacity(found.len());
        let mut skipped = 0;
        for field in found {
            if state.document.has_class(field.node, marker) {
                skipped += 1;
                continue;
            }
            state.document.add_class(field.node, marker)?;
            fields.push(field);
        }

        state.passes += 1;
        state.processed += fields.len();
        info!(
            "Page {}: {} pass over {} root(s) reported {} field(s), skipped {}",
            self.id,
            trigger,
            roots.len(),
            fields.len(),
            skipped
        );

        Ok(self.report(trigger, roots, fields, skipped))
    }

    fn report(
        &self,
        trigger: PassTrigger,
        roots: Vec<NodeId>,
        fields: Vec<DetectedField>,
        skipped: usize,
    ) -> FieldReport {
        FieldReport {
            page_id: self.id,
            trigger,
            timestamp: chrono::Utc::now().to_rfc3339(),
            roots,
            fields,
            skipped,
        }
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("marker_class", &self.settings.marker_class)
            .finish_non_exhaustive()
    }
}

/// Subtrees a mutation pass scans.
fn mutation_roots(doc: &Document, parent: NodeId, inserted: &[NodeId]) -> Vec<NodeId> {
    let enclosing = if doc.is_tag(parent, "form") {
        Some(parent)
    } else {
        doc.closest_ancestor(parent, "form")
    };
    if let Some(form) = enclosing {
        return vec![form];
    }

    let forms: Vec<NodeId> = inserted
        .iter()
        .flat_map(|&top| {
            std::iter::once(top)
                .chain(doc.descendants(top))
                .filter(|&n| doc.is_tag(n, "form"))
        })
        .collect();
    if !forms.is_empty() {
        return forms;
    }

    vec![parent]
}
