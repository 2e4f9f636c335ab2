use crate::cli::GenItpArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::utils::progress::spinner;
use polybuild::engine::error::EngineError;
use polybuild::engine::generator::{GenerationRequest, PolyplyCommand, TopologyGenerator};
use tracing::{info, warn};

pub fn run(args: GenItpArgs) -> Result<()> {
    let config = build_config(&args.session)?;
    if !args.graph.is_file() {
        return Err(EngineError::FileNotFound(args.graph.to_string_lossy().to_string()).into());
    }

    let request = request_for(&args, &config.generator.molecule_name, config.generator.verbosity);
    let generator = PolyplyCommand::new(&config.generator.program);
    info!(
        "Delegating topology generation to '{}'",
        generator.program()
    );

    let pb = spinner(&format!("Running {} gen_itp...", generator.program()));
    let result = generator.generate(&request);
    pb.finish_and_clear();

    match result {
        Ok(lines) => {
            for line in &lines {
                println!("  {}", line);
            }
            println!("✓ Topology written to: {}", args.output.display());
            Ok(())
        }
        Err(e) => {
            let error = EngineError::from(e);
            for line in error.log_lines().iter().skip(1) {
                warn!("{}", line);
                eprintln!("  {}", line);
            }
            Err(error.into())
        }
    }
}

fn request_for(args: &GenItpArgs, default_name: &str, verbosity: u8) -> GenerationRequest {
    GenerationRequest {
        name: args
            .name
            .clone()
            .unwrap_or_else(|| default_name.to_string()),
        input_path: args.include.clone(),
        verbosity,
        sequence: None,
        sequence_file_path: args.graph.clone(),
        output_path: args.output.clone(),
        library_names: vec![args.force_field.clone()],
    }
}
