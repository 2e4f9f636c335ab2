use super::config::SessionConfig;
use super::error::EngineError;
use super::events::{BlockValues, Event, EventKind, LinkEnds};
use super::forms::ArchitectureForm;
use super::generator::{GenerationRequest, PolyplyCommand, TopologyGenerator};
use super::render::Scene;
use super::state::{SessionPhase, ViewState};
use crate::core::architecture::supports_tacticity;
use crate::core::io::node_link::{NodeLinkFile, NodeLinkMetadata};
use crate::core::io::registry::{FragmentFormat, read_fragment};
use crate::core::io::traits::GraphWriter;
use crate::core::layout::{LayoutCache, LayoutError, Viewport, compute_layout};
use crate::core::library::load_library;
use crate::core::models::block::{Block, BlockKind, BlockList};
use crate::core::models::graph::MolecularGraph;
use crate::core::models::ids::NodeId;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Label under which force-field blocks are merged into one library.
const LIBRARY_CATEGORY: &str = "libs";

/// What a single event produced for the front end.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub event: EventKind,
    pub succeeded: bool,
    /// Lines appended to the log panel while handling the event.
    pub log: Vec<String>,
    /// A fresh frame when the graph or the view changed.
    pub scene: Option<Scene>,
    /// The architecture form to show, when the event opened one.
    pub form: Option<ArchitectureForm>,
}

enum Effect {
    None,
    Redraw,
    Form(ArchitectureForm),
}

/// One interactive building session.
///
/// Owns the residue graph, the block list, the layout cache and the view
/// state, and keeps them consistent across events. Structural edits re-run
/// the layout seeded with the previous positions and then re-apply the
/// current view; view edits only re-project the cached layout.
pub struct Session {
    config: SessionConfig,
    generator: Box<dyn TopologyGenerator>,
    graph: MolecularGraph,
    blocks: BlockList,
    cache: LayoutCache,
    view: ViewState,
    force_field: Option<String>,
    monomers: Vec<String>,
    form: Option<ArchitectureForm>,
    seq_path: Option<PathBuf>,
    itp_path: Option<PathBuf>,
    log: Vec<String>,
    rng: StdRng,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let generator = PolyplyCommand::new(&config.generator.program);
        Self::with_generator(config, Box::new(generator))
    }

    pub fn with_generator(config: SessionConfig, generator: Box<dyn TopologyGenerator>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            generator,
            graph: MolecularGraph::new(),
            blocks: BlockList::new(),
            cache: LayoutCache::new(),
            view: ViewState::default(),
            force_field: None,
            monomers: Vec::new(),
            form: None,
            seq_path: None,
            itp_path: None,
            log: Vec::new(),
            rng,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
    pub fn graph(&self) -> &MolecularGraph {
        &self.graph
    }
    pub fn blocks(&self) -> &BlockList {
        &self.blocks
    }
    pub fn cache(&self) -> &LayoutCache {
        &self.cache
    }
    pub fn view(&self) -> &ViewState {
        &self.view
    }
    pub fn force_field(&self) -> Option<&str> {
        self.force_field.as_deref()
    }
    pub fn monomers(&self) -> &[String] {
        &self.monomers
    }
    pub fn seq_path(&self) -> Option<&Path> {
        self.seq_path.as_deref()
    }
    pub fn itp_path(&self) -> Option<&Path> {
        self.itp_path.as_deref()
    }
    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn phase(&self) -> SessionPhase {
        SessionPhase::of(self.graph.is_empty(), &self.view)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::for_canvas(self.config.canvas.width, self.config.canvas.height)
            .with_view(self.view.zoom, self.view.pan)
    }

    /// Projects the cached layout with the current view.
    pub fn scene(&self) -> Result<Scene, EngineError> {
        Ok(Scene::build(
            &self.graph,
            &self.cache,
            &self.viewport(),
            &self.config.palette,
            self.config.canvas.radius_scale,
        )?)
    }

    /// Opens the form for a new block of `kind`, listing the current monomers.
    pub fn open_architecture(&mut self, kind: BlockKind) -> Result<ArchitectureForm, EngineError> {
        let form =
            ArchitectureForm::for_kind(kind, self.monomers.clone(), self.force_field.as_deref())?;
        self.form = Some(form.clone());
        Ok(form)
    }

    /// Handles one event to completion.
    ///
    /// Errors never escape: they are written to the log panel and the session
    /// stays usable with its state as it was before the failing event.
    #[instrument(skip_all, fields(event = %event.kind()))]
    pub fn handle(&mut self, event: Event) -> Outcome {
        let kind = event.kind();
        let log_start = self.log.len();

        let mut scene = None;
        let mut form = None;
        let mut succeeded = true;

        match self.apply(event) {
            Ok(Effect::None) => {}
            Ok(Effect::Form(opened)) => form = Some(opened),
            Ok(Effect::Redraw) => match self.scene() {
                Ok(frame) => scene = Some(frame),
                Err(e) => {
                    succeeded = false;
                    self.fail(&e);
                }
            },
            Err(e) => {
                succeeded = false;
                self.fail(&e);
            }
        }

        Outcome {
            event: kind,
            succeeded,
            log: self.log[log_start..].to_vec(),
            scene,
            form,
        }
    }

    /// Appends a problem found outside the session (such as an unreadable
    /// script line) to the log panel.
    pub fn report(&mut self, problem: &dyn std::fmt::Display) {
        warn!("{}", problem);
        self.log.push(format!("Error: {problem}"));
    }

    fn fail(&mut self, error: &EngineError) {
        warn!("{}", error);
        self.log.extend(error.log_lines());
    }

    fn note(&mut self, line: String) {
        info!("{}", line);
        self.log.push(line);
    }

    fn apply(&mut self, event: Event) -> Result<Effect, EngineError> {
        match event {
            Event::SetForceField(name) => {
                self.set_force_field(name)?;
                Ok(Effect::None)
            }
            Event::OpenArchitecture(kind) => Ok(Effect::Form(self.open_architecture(kind)?)),
            Event::AddBlock(values) => {
                self.add_block(values)?;
                Ok(Effect::Redraw)
            }
            Event::ConnectBlocks(ends) => {
                self.connect(ends)?;
                Ok(Effect::Redraw)
            }
            Event::RemoveEdge(ends) => {
                self.disconnect(ends)?;
                Ok(Effect::Redraw)
            }
            Event::RemoveBlock(label) => {
                self.remove_block(label)?;
                Ok(Effect::Redraw)
            }
            Event::WriteSeqFile(path) => {
                self.write_seq_file(path)?;
                Ok(Effect::None)
            }
            Event::GenItp(path) => {
                self.gen_itp(path)?;
                Ok(Effect::None)
            }
            Event::ZoomIn => {
                self.view.zoom_in(self.config.canvas.zoom_step);
                Ok(Effect::Redraw)
            }
            Event::ZoomOut => {
                self.view.zoom_out(self.config.canvas.zoom_step);
                Ok(Effect::Redraw)
            }
            Event::GraphEvent(cursor) => {
                let center = self.viewport().center;
                self.view.pan_to(&cursor, &center);
                Ok(Effect::Redraw)
            }
            Event::ResetView => {
                self.view.reset();
                Ok(Effect::Redraw)
            }
            Event::LoadFile(path) => {
                self.load_file(&path)?;
                Ok(Effect::Redraw)
            }
            Event::UpdateLog(text) => {
                self.log.push(text);
                Ok(Effect::None)
            }
        }
    }

    fn set_force_field(&mut self, name: String) -> Result<(), EngineError> {
        let library = load_library(
            LIBRARY_CATEGORY,
            std::slice::from_ref(&name),
            &self.config.library.extra_paths,
            &self.config.library.data_dir,
        )?;
        self.monomers = library.monomers();
        if let Some(form) = self.form.as_mut() {
            form.monomers = self.monomers.clone();
            form.tacticity_visible = supports_tacticity(&name);
        }
        self.note(format!(
            "Force field set to {name} ({} monomer(s) available)",
            self.monomers.len()
        ));
        self.force_field = Some(name);
        Ok(())
    }

    fn add_block(&mut self, values: BlockValues) -> Result<(), EngineError> {
        let form = self.form.as_ref().ok_or(EngineError::NoOpenForm)?;
        let architecture = form.architecture(values.count, values.branching)?;
        let fragment = architecture.build(&values.monomer)?;

        let nodes = self.graph.disjoint_union(&fragment);
        if let (Some(tacticity), Some(force_field)) =
            (values.tacticity, self.force_field.as_deref())
        {
            if supports_tacticity(force_field) {
                tacticity.apply(&mut self.graph, nodes, &mut self.rng);
            }
        }
        let label = self
            .blocks
            .push(Block::new(architecture.kind(), values.monomer.trim(), nodes));
        self.relayout()?;
        self.note(format!(
            "Added {} block {label}: {} x {}",
            architecture.kind(),
            nodes.len(),
            values.monomer.trim()
        ));
        Ok(())
    }

    fn resolve_ends(&self, ends: LinkEnds) -> Result<(NodeId, NodeId), EngineError> {
        let a = self.blocks.resolve(ends.block_a, ends.resid_a)?;
        let b = self.blocks.resolve(ends.block_b, ends.resid_b)?;
        Ok((a, b))
    }

    fn connect(&mut self, ends: LinkEnds) -> Result<(), EngineError> {
        let (a, b) = self.resolve_ends(ends)?;
        if !self.graph.add_edge(a, b)? {
            debug!("Residues {} and {} were already linked", a, b);
        }
        self.relayout()?;
        self.note(format!(
            "Linked block {} residue {} to block {} residue {}",
            ends.block_a, ends.resid_a, ends.block_b, ends.resid_b
        ));
        Ok(())
    }

    fn disconnect(&mut self, ends: LinkEnds) -> Result<(), EngineError> {
        let (a, b) = self.resolve_ends(ends)?;
        if !self.graph.remove_edge(a, b) {
            return Err(EngineError::EdgeNotFound { a, b });
        }
        self.relayout()?;
        self.note(format!(
            "Unlinked block {} residue {} from block {} residue {}",
            ends.block_a, ends.resid_a, ends.block_b, ends.resid_b
        ));
        Ok(())
    }

    fn remove_block(&mut self, label: usize) -> Result<(), EngineError> {
        let block = self.blocks.remove(label)?;
        for id in block.nodes.iter() {
            self.graph.remove_node(id);
        }
        let graph = &self.graph;
        self.cache.retain(|id| graph.contains_node(id));
        self.relayout()?;
        self.note(format!(
            "Removed block {label} ({} x {}); {} block(s) left",
            block.size,
            block.name,
            self.blocks.len()
        ));
        Ok(())
    }

    fn write_seq_file(&mut self, path: PathBuf) -> Result<(), EngineError> {
        NodeLinkFile::write_to_path(&self.graph, &NodeLinkMetadata::default(), &path).map_err(
            |e| EngineError::Write {
                path: path.to_string_lossy().to_string(),
                source: e,
            },
        )?;
        self.note(format!("Saved graph to {}", path.display()));
        self.seq_path = Some(path);
        Ok(())
    }

    fn gen_itp(&mut self, path: PathBuf) -> Result<(), EngineError> {
        let force_field = self.force_field.clone().ok_or(EngineError::NoForceField)?;
        let sequence_file_path = self.seq_path.clone().ok_or(EngineError::NoSavedGraph)?;
        let request = GenerationRequest {
            name: self.config.generator.molecule_name.clone(),
            input_path: None,
            verbosity: self.config.generator.verbosity,
            sequence: None,
            sequence_file_path,
            output_path: path.clone(),
            library_names: vec![force_field],
        };
        let output = self.generator.generate(&request)?;
        self.log.extend(output);
        self.note(format!("Wrote topology to {}", path.display()));
        self.itp_path = Some(path);
        Ok(())
    }

    fn load_file(&mut self, path: &Path) -> Result<(), EngineError> {
        FragmentFormat::from_path(path).map_err(|e| EngineError::from_fragment(path, e))?;
        if !path.is_file() {
            return Err(EngineError::FileNotFound(path.to_string_lossy().to_string()));
        }
        let fragment = read_fragment(path).map_err(|e| EngineError::from_fragment(path, e))?;
        if fragment.graph.is_empty() {
            return Err(LayoutError::EmptyGraph.into());
        }

        let nodes = self.graph.disjoint_union(&fragment.graph);
        let label = self
            .blocks
            .push(Block::new(BlockKind::File, &fragment.name, nodes));
        self.relayout()?;
        self.note(format!(
            "Loaded {} as block {label} ({} residue(s))",
            fragment.name,
            nodes.len()
        ));
        Ok(())
    }

    /// Lays the graph out again, seeded with the cached positions.
    fn relayout(&mut self) -> Result<(), EngineError> {
        if self.graph.is_empty() {
            self.cache.clear();
            return Ok(());
        }
        self.cache = compute_layout(&self.graph, Some(&self.cache), &self.config.layout)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::architecture::Tacticity;
    use crate::core::models::graph::Chirality;
    use crate::core::models::ids::NodeRange;
    use crate::engine::config::SessionConfigBuilder;
    use crate::engine::generator::GenerationError;
    use nalgebra::Point2;
    use std::cell::RefCell;
    use std::collections::BTreeSet;
    use std::rc::Rc;

    fn config(data_dir: &Path) -> SessionConfig {
        SessionConfigBuilder::new()
            .data_dir(data_dir.to_path_buf())
            .seed(7)
            .build()
            .unwrap()
    }

    fn session() -> Session {
        Session::new(config(Path::new("/nonexistent")))
    }

    fn run(session: &mut Session, line: &str) -> Outcome {
        session.handle(Event::parse(line).unwrap())
    }

    fn add_linear(session: &mut Session, monomer: &str, count: usize) -> Outcome {
        run(session, "linear_block");
        run(session, &format!("add_block monomer={monomer} count={count}"))
    }

    fn node_ids(session: &Session) -> BTreeSet<NodeId> {
        session.graph().node_ids().collect()
    }

    fn cache_keys(session: &Session) -> BTreeSet<NodeId> {
        session.cache().keys().collect()
    }

    struct ScriptedGenerator {
        fail: bool,
        requests: Rc<RefCell<Vec<GenerationRequest>>>,
    }

    impl TopologyGenerator for ScriptedGenerator {
        fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>, GenerationError> {
            self.requests.borrow_mut().push(request.clone());
            if self.fail {
                Err(GenerationError::Failed {
                    status: Some(1),
                    lines: vec!["ERROR - No block named PEX in force field".into()],
                })
            } else {
                Ok(vec!["INFO - generating molecule".into()])
            }
        }
    }

    fn data_dir() -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        for (library, block) in [("martini3", "PEO"), ("oplsaaLigParGen", "PS")] {
            let dir = root.path().join(library);
            std::fs::create_dir(&dir).unwrap();
            std::fs::write(
                dir.join(format!("{block}.itp")),
                format!("[ moleculetype ]\n{block} 1\n[ atoms ]\n1 T 1 {block} A 1 0\n"),
            )
            .unwrap();
        }
        root
    }

    #[test]
    fn removing_a_block_keeps_real_ids_and_relabels() {
        let mut session = session();
        add_linear(&mut session, "PEO", 3);
        add_linear(&mut session, "PS", 2);
        assert_eq!(
            session.blocks().ranges(),
            vec![NodeRange::new(0, 3), NodeRange::new(3, 5)]
        );

        let outcome = run(&mut session, "remove_block 1");
        assert!(outcome.succeeded);
        assert_eq!(session.blocks().len(), 1);
        assert_eq!(session.blocks().labels(), vec!["1 PS 2"]);
        let remaining = session.blocks().get(1).unwrap();
        assert_eq!(remaining.local_range(), NodeRange::new(0, 2));
        assert_eq!(
            node_ids(&session),
            BTreeSet::from([NodeId(3), NodeId(4)])
        );
        assert_eq!(cache_keys(&session), node_ids(&session));
        assert_eq!(outcome.scene.unwrap().nodes.len(), 2);
    }

    #[test]
    fn zooming_reprojects_without_relayout() {
        let mut session = session();
        add_linear(&mut session, "PEO", 4);
        let before = session.cache().clone();

        run(&mut session, "zoom_in");
        let outcome = run(&mut session, "zoom_in");

        assert!((session.view().zoom + 0.24).abs() < 1e-12);
        assert_eq!(session.cache(), &before);
        assert_eq!(session.phase(), SessionPhase::ViewAdjusted);
        assert!(outcome.scene.is_some());
    }

    #[test]
    fn three_residue_chain_fits_the_canvas() {
        let mut session = session();
        let outcome = add_linear(&mut session, "PEO", 3);
        let scene = outcome.scene.unwrap();
        assert_eq!(scene.nodes.len(), 3);
        assert_eq!(scene.lines.len(), 2);
        for node in &scene.nodes {
            assert!((0.0..=800.0).contains(&node.center.x));
            assert!((0.0..=600.0).contains(&node.center.y));
        }
    }

    #[test]
    fn structural_edits_keep_the_view() {
        let mut session = session();
        add_linear(&mut session, "PEO", 2);
        run(&mut session, "zoom_in");
        run(&mut session, "graph_event 350 320");
        add_linear(&mut session, "PS", 2);

        assert!((session.view().zoom + 0.12).abs() < 1e-12);
        assert_eq!(session.view().pan, nalgebra::Vector2::new(50.0, -20.0));

        run(&mut session, "reset_view");
        assert_eq!(session.phase(), SessionPhase::LaidOut);
    }

    #[test]
    fn removing_the_last_block_empties_the_session() {
        let mut session = session();
        add_linear(&mut session, "PEO", 2);
        let outcome = run(&mut session, "remove_block 1");

        assert!(outcome.succeeded);
        assert!(outcome.scene.unwrap().is_empty());
        assert!(session.cache().is_empty());
        assert_eq!(session.phase(), SessionPhase::Empty);
    }

    #[test]
    fn links_are_added_and_removed_by_block_and_residue() {
        let mut session = session();
        add_linear(&mut session, "PEO", 3);
        add_linear(&mut session, "PS", 2);

        assert!(run(&mut session, "connect_blocks 1 3 2 1").succeeded);
        assert!(session.graph().has_edge(NodeId(2), NodeId(3)));

        assert!(run(&mut session, "remove_edge 1 3 2 1").succeeded);
        assert!(!session.graph().has_edge(NodeId(2), NodeId(3)));

        let outcome = run(&mut session, "remove_edge 1 3 2 1");
        assert!(!outcome.succeeded);
        assert!(outcome.log[0].contains("not linked"));
    }

    #[test]
    fn unknown_block_reference_leaves_the_graph_untouched() {
        let mut session = session();
        add_linear(&mut session, "PEO", 3);
        let graph_before = session.graph().clone();
        let cache_before = session.cache().clone();

        let outcome = run(&mut session, "connect_blocks 1 1 4 1");

        assert!(!outcome.succeeded);
        assert!(outcome.scene.is_none());
        assert!(outcome.log[0].starts_with("Error: Unknown block reference"));
        assert_eq!(session.graph(), &graph_before);
        assert_eq!(session.cache(), &cache_before);

        assert!(!run(&mut session, "connect_blocks 1 4 1 1").succeeded);
        assert!(!run(&mut session, "remove_block 2").succeeded);
        assert_eq!(session.graph(), &graph_before);
    }

    #[test]
    fn unsupported_file_is_not_merged() {
        let mut session = session();
        add_linear(&mut session, "PEO", 2);
        let outcome = run(&mut session, "load_file molecule.pdb");

        assert!(!outcome.succeeded);
        assert_eq!(outcome.log, vec!["Error: Unsupported file format '.pdb'"]);
        assert_eq!(session.graph().node_count(), 2);
        assert_eq!(session.blocks().len(), 1);
    }

    #[test]
    fn saved_graph_can_be_loaded_back_as_a_block() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diblock.json");
        let mut session = session();
        add_linear(&mut session, "PEO", 3);
        run(&mut session, "connect_blocks 1 1 1 3");
        run(&mut session, &format!("write_seq_file {}", path.display()));
        assert_eq!(session.seq_path(), Some(path.as_path()));

        let outcome = run(&mut session, &format!("load_file {}", path.display()));
        assert!(outcome.succeeded);
        assert_eq!(session.blocks().labels(), vec!["1 PEO 3", "2 diblock 3"]);
        assert_eq!(session.graph().node_count(), 6);
        assert!(session.graph().has_edge(NodeId(3), NodeId(5)));
        assert_eq!(session.blocks().get(2).unwrap().kind, BlockKind::File);
        assert_eq!(cache_keys(&session), node_ids(&session));
    }

    #[test]
    fn blocks_need_an_open_form() {
        let mut session = session();
        let outcome = run(&mut session, "add_block monomer=PEO count=2");
        assert!(!outcome.succeeded);
        assert!(session.graph().is_empty());

        let opened = run(&mut session, "tree_block");
        assert_eq!(opened.form.unwrap().title, "tree block");
        run(&mut session, "add_block monomer=PAMAM count=3 branching=2");
        assert_eq!(session.graph().node_count(), 7);
        assert_eq!(session.blocks().labels(), vec!["1 PAMAM 7"]);
    }

    #[test]
    fn tacticity_applies_to_the_new_block_for_atomistic_force_fields() {
        let root = data_dir();
        let mut session = Session::new(config(root.path()));

        assert!(run(&mut session, "set_force_field oplsaaLigParGen").succeeded);
        assert_eq!(session.monomers(), ["PS".to_string()]);
        run(&mut session, "linear_block");
        run(&mut session, "add_block monomer=PS count=2 tacticity=isotactic-R");
        run(&mut session, "add_block monomer=PS count=2 tacticity=syndiotactic");

        let labels: Vec<_> = session
            .graph()
            .nodes()
            .map(|(_, attrs)| attrs.tacticity)
            .collect();
        assert_eq!(
            labels,
            vec![
                Some(Chirality::R),
                Some(Chirality::R),
                Some(Chirality::R),
                Some(Chirality::S)
            ]
        );
    }

    #[test]
    fn martini_blocks_carry_no_tacticity() {
        let root = data_dir();
        let mut session = Session::new(config(root.path()));
        run(&mut session, "set_force_field martini3");
        let form = session.open_architecture(BlockKind::Linear).unwrap();
        assert!(!form.tacticity_visible);
        assert_eq!(form.monomers, vec!["PEO"]);

        session.handle(Event::AddBlock(BlockValues {
            monomer: "PEO".into(),
            count: Some(3),
            branching: None,
            tacticity: Some(Tacticity::Atactic),
        }));
        assert!(
            session
                .graph()
                .nodes()
                .all(|(_, attrs)| attrs.tacticity.is_none())
        );
    }

    #[test]
    fn unknown_force_field_is_logged() {
        let root = data_dir();
        let mut session = Session::new(config(root.path()));
        let outcome = run(&mut session, "set_force_field gromos54a7");
        assert!(!outcome.succeeded);
        assert!(session.force_field().is_none());
        assert!(outcome.log[0].contains("gromos54a7"));
    }

    #[test]
    fn generation_requires_force_field_and_saved_graph() {
        let root = data_dir();
        let mut session = Session::new(config(root.path()));
        let outcome = run(&mut session, "gen_itp out.itp");
        assert_eq!(outcome.log, vec!["Error: No force field selected"]);

        run(&mut session, "set_force_field martini3");
        let outcome = run(&mut session, "gen_itp out.itp");
        assert!(outcome.log[0].starts_with("Error: No saved graph"));
    }

    #[test]
    fn generator_output_goes_to_the_log() {
        let root = data_dir();
        let graph_path = root.path().join("graph.json");
        let requests = Rc::new(RefCell::new(Vec::new()));

        for fail in [false, true] {
            let generator = ScriptedGenerator {
                fail,
                requests: Rc::clone(&requests),
            };
            let mut session = Session::with_generator(config(root.path()), Box::new(generator));
            run(&mut session, "set_force_field martini3");
            add_linear(&mut session, "PEO", 2);
            run(&mut session, &format!("write_seq_file {}", graph_path.display()));

            let outcome = run(&mut session, "gen_itp peo.itp");
            if fail {
                assert!(!outcome.succeeded);
                assert_eq!(
                    outcome.log,
                    vec![
                        "Error: Topology generation failed".to_string(),
                        "ERROR - No block named PEX in force field".to_string()
                    ]
                );
                assert!(session.itp_path().is_none());
            } else {
                assert!(outcome.succeeded);
                assert_eq!(outcome.log[0], "INFO - generating molecule");
                assert_eq!(session.itp_path(), Some(Path::new("peo.itp")));
            }
        }

        let requests = requests.borrow();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].sequence_file_path, graph_path);
        assert_eq!(requests[0].library_names, vec!["martini3"]);
    }

    #[test]
    fn free_text_is_appended_to_the_log() {
        let mut session = session();
        let outcome = run(&mut session, "update_log polyply finished");
        assert_eq!(outcome.log, vec!["polyply finished"]);
        assert_eq!(session.log(), ["polyply finished".to_string()]);
    }

    #[test]
    fn canvas_click_pans_relative_to_the_centre() {
        let mut session = session();
        add_linear(&mut session, "PEO", 1);
        let outcome = session.handle(Event::GraphEvent(Point2::new(400.0, 250.0)));
        let scene = outcome.scene.unwrap();
        assert_eq!(scene.nodes[0].center, Point2::new(400.0, 250.0));
    }
}
