use crate::{
    cli::args::{InterpolateArgs, LintArgs, LintFormat, PathsArgs},
    core::{
        has_errors, suggest, AppError, CatalogCache, FieldType, InterpolationEngine,
        InterpolatorRegistry, KeyCase, LintRegistry, LintSeverity, PipecheckConfig,
        PipelineDocument, StepPaths, StepRegistry, Variables,
    },
    Result,
};
use anyhow::anyhow;
use indexmap::IndexMap;

fn variables_from(pairs: Vec<(String, String)>) -> Variables {
    pairs.into_iter().collect()
}

pub fn lint(args: LintArgs, config: &PipecheckConfig) -> Result<()> {
    tracing::info!("Linting pipeline: {}", args.file.display());

    let document = PipelineDocument::load_from_file(&args.file)?;
    let variables = variables_from(args.vars);
    let cache = CatalogCache::new();
    let linter = LintRegistry::from_config(&cache, &config.engine);
    let results = linter.run(&document, &variables);

    let errors = results
        .iter()
        .filter(|result| result.severity == LintSeverity::Error)
        .count();
    let warnings = results
        .iter()
        .filter(|result| result.severity == LintSeverity::Warning)
        .count();

    match args.format {
        LintFormat::Text => {
            for result in &results {
                println!("{}", result);
            }
            println!(
                "{}: {} error(s), {} warning(s)",
                args.file.display(),
                errors,
                warnings
            );
        }
        LintFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }

    if has_errors(&results) {
        return Err(anyhow!(
            "{} failed lint with {} error(s)",
            args.file.display(),
            errors
        ));
    }
    Ok(())
}

pub fn interpolate(args: InterpolateArgs, config: &PipecheckConfig) -> Result<()> {
    tracing::info!("Interpolating pipeline: {}", args.file.display());

    let document = PipelineDocument::load_from_file(&args.file)?;
    let variables = variables_from(args.vars);
    let cache = CatalogCache::new();
    let registry = StepRegistry::builtin();
    let engine = InterpolationEngine::from_cache(&cache, &registry, InterpolatorRegistry::builtin())
        .with_key_case(config.engine.key_case)
        .with_default_step_type(config.engine.default_step_type.clone());

    let coerced = engine
        .handle_all_steps(&document.value, &variables)
        .map_err(AppError::from)?;
    print!("{}", serde_yaml::to_string(&coerced)?);
    Ok(())
}

pub fn paths(args: PathsArgs) -> Result<()> {
    let registry = StepRegistry::builtin();
    let interpolators = InterpolatorRegistry::builtin();
    interpolators
        .get(args.field_type)
        .map_err(AppError::from)?;

    let cache = CatalogCache::new();
    let catalog = cache.get_or_build(&registry, &interpolators.field_types());
    let case = if args.camel {
        KeyCase::Camel
    } else {
        KeyCase::Plain
    };

    let output = match args.step {
        Some(step_type) => {
            if !registry.contains(&step_type) {
                let hint = suggest(registry.step_types(), &step_type)
                    .map(|name| format!(" (did you mean '{}'?)", name))
                    .unwrap_or_default();
                return Err(anyhow!("unknown step type '{}'{}", step_type, hint));
            }
            let paths = catalog
                .get_paths_for_step(args.field_type, &step_type, case)
                .cloned()
                .unwrap_or_default();
            serde_json::to_string_pretty(&paths)?
        }
        None => {
            let view: IndexMap<FieldType, StepPaths> = catalog
                .view(case)
                .iter()
                .filter(|(field_type, _)| **field_type == args.field_type)
                .map(|(field_type, paths)| (*field_type, paths.clone()))
                .collect();
            serde_json::to_string_pretty(&view)?
        }
    };
    println!("{}", output);
    Ok(())
}
