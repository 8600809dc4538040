// Module selection, layouts, local-skip handling and the bundle view.

use anyhow::Result;
use bmad_resolver::core::{ContentType, ResolverError};
use bmad_resolver::resolver::{ResolveOptions, resolve};
use bmad_resolver::test_utils::{ContentTreeFixture, init_test_logging};

/// Source layout: `core/` next to `modules/<name>/`
#[tokio::test]
async fn test_source_layout_with_requested_module() -> Result<()> {
    init_test_logging(None);
    let tree = ContentTreeFixture::new()?;
    tree.add_file("core/tasks/create-doc.md", "# Create doc")?;
    tree.add_file("modules/bmm/agents/pm.md", "Uses @task-create-doc and @task-plan")?;
    tree.add_file("modules/bmm/tasks/plan.md", "# Plan")?;
    tree.add_file("modules/cis/agents/muse.md", "# Not requested")?;

    let result = resolve(tree.root(), &["bmm".to_string()], &ResolveOptions::default()).await?;

    assert_eq!(result.modules, vec!["core".to_string(), "bmm".to_string()]);
    assert_eq!(result.all_files.len(), 3);
    assert!(!result.contains(&tree.path("modules/cis/agents/muse.md")));
    assert_eq!(result.files_of("bmm", ContentType::Agent), &[tree.path("modules/bmm/agents/pm.md")]);
    assert_eq!(result.files_of("core", ContentType::Task), &[tree.path("core/tasks/create-doc.md")]);
    assert!(result.missing.is_empty());
    Ok(())
}

/// Seeds come from core first, then requested modules in request order
#[tokio::test]
async fn test_primary_file_order() -> Result<()> {
    let tree = ContentTreeFixture::new()?;
    tree.add_file("cis/agents/z.md", "")?;
    tree.add_file("bmm/agents/y.md", "")?;
    tree.add_file("core/tasks/b.md", "")?;
    tree.add_file("core/agents/a.md", "")?;

    let modules = vec!["cis".to_string(), "bmm".to_string()];
    let result = resolve(tree.root(), &modules, &ResolveOptions::default()).await?;

    let names: Vec<(&str, &str)> =
        result.primary_files.iter().map(|p| (p.module.as_str(), p.name.as_str())).collect();
    assert_eq!(names, vec![("core", "a"), ("core", "b"), ("cis", "z"), ("bmm", "y")]);
    Ok(())
}

/// Command references prefer requested modules over core
#[tokio::test]
async fn test_command_collision_prefers_requested_module() -> Result<()> {
    let tree = ContentTreeFixture::new()?;
    tree.add_file("core/agents/master.md", "Run @task-shared")?;
    tree.add_file("core/tasks/shared.md", "core version")?;
    tree.add_file("ext/tasks/shared.md", "ext version")?;

    let with_ext = resolve(tree.root(), &["ext".to_string()], &ResolveOptions::default()).await?;
    let targets = with_ext.graph.references_from(&tree.path("core/agents/master.md"));
    assert_eq!(targets, vec![tree.path("ext/tasks/shared.md")]);

    let core_only = resolve(tree.root(), &[], &ResolveOptions::default()).await?;
    let targets = core_only.graph.references_from(&tree.path("core/agents/master.md"));
    assert_eq!(targets, vec![tree.path("core/tasks/shared.md")]);
    Ok(())
}

/// Qualified `@bmad-<module>-<type>-<name>` and bare `@bmad-<name>` commands
#[tokio::test]
async fn test_bmad_commands() -> Result<()> {
    let tree = ContentTreeFixture::new()?;
    tree.add_file("core/agents/bmad-master.md", "# Master")?;
    tree.add_file("core/tasks/entry.md", "Ask @bmad-master, then @bmad-bmm-agents-analyst")?;
    tree.add_file("bmm/agents/analyst.md", "# Analyst")?;

    let result = resolve(tree.root(), &[], &ResolveOptions::default()).await?;

    let targets = result.graph.references_from(&tree.path("core/tasks/entry.md"));
    assert_eq!(targets, vec![tree.path("core/agents/bmad-master.md"), tree.path("bmm/agents/analyst.md")]);
    assert!(result.missing.is_empty());
    Ok(())
}

/// Deep module paths, extension fallback and nested data files
#[tokio::test]
async fn test_deep_paths_and_data_classification() -> Result<()> {
    let tree = ContentTreeFixture::new()?;
    tree.add_file(
        "core/agents/analyst.md",
        "Load bmad/core/tasks/brainstorm/steps/intro and bmad/core/tasks/brainstorm/methods.csv",
    )?;
    tree.add_file("core/tasks/brainstorm/steps/intro.md", "# Intro")?;
    tree.add_file("core/tasks/brainstorm/methods.csv", "name,desc\n")?;

    let mut options = ResolveOptions::default();
    options.config.seed_types = vec![ContentType::Agent];
    let result = resolve(tree.root(), &[], &options).await?;

    assert_eq!(result.primary_files.len(), 1);
    assert_eq!(result.all_files.len(), 3);
    assert_eq!(result.files_of("core", ContentType::Task), &[tree.path("core/tasks/brainstorm/steps/intro.md")]);
    assert_eq!(result.files_of("core", ContentType::Data), &[tree.path("core/tasks/brainstorm/methods.csv")]);
    Ok(())
}

/// Local-skip files are reported but neither seeded nor bundled
#[tokio::test]
async fn test_local_skip_files() -> Result<()> {
    let tree = ContentTreeFixture::new()?;
    tree.add_file("core/agents/keep.md", "# Keep")?;
    tree.add_file("core/agents/dev-only.md", "<agent id=\"dev\" localskip=\"true\">\n@task-secret\n</agent>\n")?;
    tree.add_file("core/agents/also-skip.md", "---\nlocalskip: true\n---\n# Skip\n")?;
    tree.add_file("ext/tasks/secret.md", "# Only reachable from the skipped agent")?;

    let result = resolve(tree.root(), &[], &ResolveOptions::default()).await?;

    let mut skipped = result.skipped.clone();
    skipped.sort();
    assert_eq!(skipped, vec![tree.path("core/agents/also-skip.md"), tree.path("core/agents/dev-only.md")]);
    assert_eq!(result.all_files, vec![tree.path("core/agents/keep.md")]);

    let bundle = result.bundle();
    assert_eq!(bundle.metadata.total_files, 1);
    assert_eq!(bundle.agents.len(), 1);
    assert_eq!(bundle.agents[0].path, "core/agents/keep.md");
    Ok(())
}

/// A local-skip file reached only by reference is skipped like a seed
#[tokio::test]
async fn test_referenced_local_skip_file_is_not_followed() -> Result<()> {
    let tree = ContentTreeFixture::new()?;
    tree.add_file("core/agents/a.md", "Talk to bmad/bmm/agents/web.md")?;
    tree.add_file("bmm/agents/web.md", "<agent id=\"web\" localskip=\"true\">\n@task-secret\n</agent>\n")?;
    tree.add_file("bmm/agents/fm.md", "---\nlocalskip: true\n---\n@task-secret\n")?;
    tree.add_file("core/tasks/relay.md", "Hand off to bmad/bmm/agents/fm.md")?;
    tree.add_file("core/tasks/secret.md", "# Only reachable from skipped agents")?;

    let mut options = ResolveOptions::default();
    options.config.seed_types = vec![ContentType::Agent];
    let mut relay_seed = options.clone();
    relay_seed.config.seed_types.push(ContentType::Task);

    let result = resolve(tree.root(), &[], &options).await?;
    assert_eq!(result.all_files, vec![tree.path("core/agents/a.md")]);
    assert_eq!(result.skipped, vec![tree.path("bmm/agents/web.md")]);
    assert!(result.graph.references_from(&tree.path("core/agents/a.md")).is_empty());
    assert!(result.missing.is_empty());

    let bundle = result.bundle();
    assert_eq!(bundle.agents.len(), 1);
    assert_eq!(bundle.agents[0].path, "core/agents/a.md");

    // Front-matter marker on a file outside the selected modules
    let result = resolve(tree.root(), &[], &relay_seed).await?;
    assert!(!result.contains(&tree.path("bmm/agents/fm.md")));
    assert!(result.skipped.contains(&tree.path("bmm/agents/fm.md")));
    Ok(())
}

/// The bundle groups files by type across modules
#[tokio::test]
async fn test_bundle_groups_by_type() -> Result<()> {
    let tree = ContentTreeFixture::new()?;
    tree.add_file("core/agents/master.md", "@task-create")?;
    tree.add_file("core/tasks/create.md", "---\ntemplate: bmad/bmm/templates/prd.md\n---\n")?;
    tree.add_file("bmm/agents/pm.md", "# PM")?;
    tree.add_file("bmm/templates/prd.md", "# PRD")?;

    let result = resolve(tree.root(), &["bmm".to_string()], &ResolveOptions::default()).await?;
    let bundle = result.bundle();

    assert_eq!(bundle.metadata.modules, vec!["core".to_string(), "bmm".to_string()]);
    assert_eq!(bundle.metadata.total_files, 4);
    assert_eq!(bundle.section(ContentType::Agent).len(), 2);
    assert_eq!(bundle.section(ContentType::Task).len(), 1);
    assert_eq!(bundle.section(ContentType::Template).len(), 1);
    assert_eq!(bundle.templates[0].module.as_deref(), Some("bmm"));

    let json: serde_json::Value = serde_json::from_str(&bundle.to_json()?)?;
    assert_eq!(json["metadata"]["total_files"], 4);
    assert_eq!(json["templates"][0]["path"], "bmm/templates/prd.md");
    Ok(())
}

/// Summary counts and the text report
#[tokio::test]
async fn test_summary_report() -> Result<()> {
    let tree = ContentTreeFixture::new()?;
    tree.add_file("core/agents/a.md", "@task-b @task-missing")?;
    tree.add_file("core/tasks/b.md", "@task-c")?;
    tree.add_file("bmm/tasks/c.md", "# C")?;

    let result = resolve(tree.root(), &["bmm".to_string()], &ResolveOptions::verbose(true)).await?;
    let summary = result.summary();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.missing, 1);
    assert_eq!(summary.count("core", ContentType::Task), 1);
    assert_eq!(summary.count("bmm", ContentType::Task), 1);

    let text = summary.to_string();
    assert!(text.contains("CORE"));
    assert!(text.contains("BMM"));
    assert!(text.contains("Agents: 1"));
    assert!(text.contains("Templates: 0"));
    assert!(text.contains("@task-missing"));
    Ok(())
}

#[tokio::test]
async fn test_invalid_roots_fail() -> Result<()> {
    let tree = ContentTreeFixture::new()?;
    let file = tree.add_file("plain.md", "x")?;

    let err = resolve(&tree.path("absent"), &[], &ResolveOptions::default()).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<ResolverError>(), Some(ResolverError::ContentRootNotFound { .. })));

    let err = resolve(&file, &[], &ResolveOptions::default()).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<ResolverError>(), Some(ResolverError::ContentRootNotDirectory { .. })));

    // A root without core is valid and simply empty
    let empty = resolve(tree.root(), &[], &ResolveOptions::default()).await?;
    assert!(empty.all_files.is_empty());
    assert!(empty.modules.is_empty());
    Ok(())
}
