//! End-to-end browsing against the in-memory provider.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use genoview::config::Config;
use genoview::error::NoticeLevel;
use genoview::model::{Feature, FeatureType, GenomeWindow};
use genoview::provider::{serve, GenomeProvider, MemoryProvider, ProviderWorker, Request, Response};
use genoview::render::DrawOp;
use genoview::session::{DisplayContext, Session, SessionObserver};

const GFF: &str = "##gff-version 3\n\
    chrT\tRefSeq\tgene\t100\t900\t.\t+\t.\tID=gene1;Name=thrL\n\
    chrT\tRefSeq\tCDS\t190\t255\t.\t+\t0\tID=cds1;gene=thrL\n\
    chrT\tRefSeq\tmRNA\t100\t900\t.\t+\t.\tID=rna1\n\
    chrT\tRefSeq\tgene\t20000\t24000\t.\t-\t.\tID=gene2;Name=lacZ\n\
    chrT\tRefSeq\tpromoter\t19000\t19999\t.\t-\t.\tlocus_tag=p1\n\
    chrT\tRefSeq\ttRNA\t40000\t40075\t.\t+\t.\tName=tRNA-Leu\n";

fn fasta(len: usize) -> String {
    format!(">chrT test genome\n{}\n", "ACGT".repeat(len / 4))
}

fn provider() -> MemoryProvider {
    MemoryProvider::from_content(&fasta(50_000), Some(GFF)).unwrap()
}

/// Serves every queued request synchronously, in order.
fn pump(session: &mut Session, provider: &dyn GenomeProvider) {
    loop {
        let requests = session.drain_requests();
        if requests.is_empty() {
            break;
        }
        for request in requests {
            session.handle_response(serve(provider, request));
        }
    }
}

fn open(provider: &MemoryProvider) -> Session {
    let mut session = Session::new(Config::default());
    session.set_canvas_width(800.0);
    session.activate_genome(provider.genome_info().unwrap());
    pump(&mut session, provider);
    session
}

fn bounds(window: GenomeWindow) -> (u64, u64) {
    (window.start(), window.end())
}

#[test]
fn test_open_genome() {
    let provider = provider();
    let session = open(&provider);

    assert_eq!(bounds(session.window()), (0, 50_000));
    assert_eq!(session.all_features().len(), 6);
    let counts = session.catalog().counts();
    assert_eq!(counts[&FeatureType::Gene], 2);
    assert_eq!(counts[&FeatureType::Mrna], 1);
    assert_eq!(counts[&FeatureType::Cds], 1);
    // promoter and tRNA both land on the regulatory track
    assert_eq!(counts[&FeatureType::Regulatory], 2);

    let frame = session.render_frame().unwrap();
    assert_eq!(frame.stats.features_drawn, 6);
    assert!(!session.is_loading());
}

#[test]
fn test_zoom_then_pan() {
    let provider = provider();
    let mut session = open(&provider);

    session.zoom_in();
    session.zoom_in();
    assert_eq!(bounds(session.window()), (18_750, 31_250));

    session.pan_right();
    assert_eq!(bounds(session.window()), (25_000, 37_500));

    pump(&mut session, &provider);
    let frame = session.frame().unwrap();
    assert_eq!(frame.window, session.window());
    // Nothing annotated between 25000 and 37500
    assert!(frame.records.is_empty());

    session.reset_view();
    assert_eq!(bounds(session.window()), (0, 50_000));
}

#[test]
fn test_zoom_never_below_floor() {
    let provider = provider();
    let mut session = open(&provider);
    for _ in 0..20 {
        session.zoom_in();
    }
    assert_eq!(session.window().span(), 1_000);
}

#[test]
fn test_goto_annotation_by_name() {
    let provider = provider();
    let mut session = open(&provider);

    session.goto_query("LACZ");
    pump(&mut session, &provider);
    assert_eq!(bounds(session.window()), (18_000, 26_000));

    session.goto_query("thrl");
    pump(&mut session, &provider);
    assert_eq!(bounds(session.window()), (0, 1_900));
    assert!(session.notice().map_or(true, |n| n.level == NoticeLevel::Info));
}

#[test]
fn test_goto_unknown_name_keeps_window() {
    let provider = provider();
    let mut session = open(&provider);
    session.zoom_in();
    pump(&mut session, &provider);
    let before = session.window();

    session.goto_query("nosuchgene");
    pump(&mut session, &provider);

    assert_eq!(session.window(), before);
    let notice = session.notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert_eq!(notice.text, "Annotation not found: nosuchgene");
}

#[derive(Default)]
struct Recorder {
    windows: Vec<(u64, u64)>,
    selected: Vec<String>,
}

struct SharedRecorder(Rc<RefCell<Recorder>>);

impl SessionObserver for SharedRecorder {
    fn on_window_changed(&mut self, window: &GenomeWindow) {
        self.0.borrow_mut().windows.push(bounds(*window));
    }

    fn on_feature_selected(&mut self, feature: &Feature) {
        self.0.borrow_mut().selected.push(feature.name.clone());
    }
}

#[test]
fn test_select_catalog_entry() {
    let provider = provider();
    let mut session = open(&provider);
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    session.add_observer(Box::new(SharedRecorder(recorder.clone())));

    // Second gene in the catalog: lacZ
    session.catalog_down();
    session.select_catalog_entry();
    assert_eq!(session.display(), DisplayContext::Sequence);
    assert_eq!(bounds(session.window()), (18_000, 26_000));
    assert!(session.selected().unwrap().bases.is_none());

    pump(&mut session, &provider);
    let selected = session.selected().unwrap();
    assert_eq!(selected.feature.name, "lacZ");
    let bases = selected.bases.as_ref().unwrap();
    assert_eq!(bases.len(), 4_000);
    assert!(bases.starts_with("ACGT"));

    let recorder = recorder.borrow();
    assert_eq!(recorder.windows, vec![(18_000, 26_000)]);
    assert_eq!(recorder.selected, vec!["lacZ".to_string()]);
}

#[test]
fn test_out_of_order_responses() {
    let provider = provider();
    let mut session = open(&provider);

    session.zoom_in();
    let first = session.drain_requests();
    session.pan_right();
    let second = session.drain_requests();

    // The newer answer arrives first; the older one must not replace it.
    for request in second.into_iter().chain(first) {
        session.handle_response(serve(&provider, request));
    }

    let frame = session.frame().unwrap();
    assert_eq!(frame.window, session.window());
    assert_eq!(bounds(frame.window), (25_000, 50_000));
}

#[test]
fn test_provider_failure_is_a_notice() {
    let provider = provider();
    let mut session = open(&provider);
    let drawn = session.render_frame().unwrap();

    // The data source goes away.
    let gone = MemoryProvider::empty();
    session.zoom_in();
    pump(&mut session, &gone);

    let notice = session.notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.text.contains("No active genome"));
    assert_eq!(bounds(session.window()), (12_500, 37_500));
    // Still the last good frame, for the window it was fetched for
    assert_eq!(session.render_frame().unwrap(), drawn);
}

#[test]
fn test_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let fna = dir.path().join("chrT.fna");
    let gff = dir.path().join("chrT.gff3");
    std::fs::write(&fna, fasta(50_000)).unwrap();
    std::fs::write(&gff, GFF).unwrap();

    let provider = MemoryProvider::from_files(&fna, Some(&gff)).unwrap();
    let info = provider.genome_info().unwrap();
    assert_eq!(info.id, "chrT");
    assert_eq!(info.length, 50_000);
    assert!(info.has_annotations);
}

#[test]
fn test_browse_through_worker() {
    let provider: Arc<dyn GenomeProvider> = Arc::new(provider());
    let worker = ProviderWorker::spawn(provider.clone()).unwrap();
    let mut session = Session::new(Config::default());
    session.set_canvas_width(640.0);
    session.activate_genome(provider.genome_info().unwrap());

    let mut outstanding = 0;
    for request in session.drain_requests() {
        worker.submit(request).unwrap();
        outstanding += 1;
    }
    while outstanding > 0 {
        let response = worker.recv_timeout(Duration::from_secs(5)).unwrap();
        session.handle_response(response);
        outstanding -= 1;
    }

    let frame = session.render_frame().unwrap();
    assert_eq!(frame.canvas.width, 640.0);
    let texts: Vec<&str> = frame
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::FillText { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert!(texts.contains(&"GENE"));
    assert!(texts.contains(&"0"));
}

#[test]
fn test_response_tokens_match_requests() {
    let provider = provider();
    let mut session = open(&provider);
    session.goto_query("lacZ");
    let requests = session.drain_requests();
    assert_eq!(requests.len(), 1);
    let Request::FeatureByName { token, .. } = &requests[0] else {
        panic!("expected a lookup");
    };
    let response = serve(&provider, requests[0].clone());
    assert!(matches!(response, Response::FeatureByName { .. }));
    assert_eq!(response.token(), *token);
}
