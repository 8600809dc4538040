// Graph properties every resolution must hold regardless of tree shape.

use anyhow::Result;
use bmad_resolver::core::ContentType;
use bmad_resolver::resolver::{ResolveOptions, resolve};
use bmad_resolver::test_utils::{ContentTreeFixture, init_test_logging};

/// A file reached through many distinct reference forms is listed once
#[tokio::test]
async fn test_file_reached_many_ways_is_listed_once() -> Result<()> {
    init_test_logging(None);
    let tree = ContentTreeFixture::new()?;

    tree.add_file(
        "core/agents/a.md",
        r#"---
dependencies:
  - "{project-root}/bmad/core/tasks/shared.md"
  - ../tasks/shared.md
---
Run @task-shared or bmad/core/tasks/shared.md.
<step exec="{project-root}/bmad/core/tasks/shared.md"/>
"#,
    )?;
    tree.add_file("core/agents/b.md", "Also uses @task-shared")?;
    tree.add_file("core/tasks/shared.md", "# Shared")?;

    let result = resolve(tree.root(), &[], &ResolveOptions::default()).await?;

    let shared = tree.path("core/tasks/shared.md");
    assert_eq!(result.all_files.iter().filter(|f| **f == shared).count(), 1);
    assert_eq!(result.all_files.len(), 3);
    assert!(result.missing.is_empty());
    Ok(())
}

/// `core` is present for empty and nonexistent module selections
#[tokio::test]
async fn test_core_always_included() -> Result<()> {
    let tree = ContentTreeFixture::new()?;
    tree.add_file("core/agents/master.md", "# Master")?;

    for modules in [vec![], vec!["ghost".to_string()], vec!["ghost".to_string(), "core".to_string()]] {
        let result = resolve(tree.root(), &modules, &ResolveOptions::default()).await?;
        assert_eq!(result.modules, vec!["core".to_string()]);
        assert_eq!(result.files_of("core", ContentType::Agent).len(), 1);
        assert!(!result.by_module.contains_key("ghost"));
    }
    Ok(())
}

/// Two-node cycle through front-matter dependencies
#[tokio::test]
async fn test_two_node_cycle_terminates() -> Result<()> {
    let tree = ContentTreeFixture::new()?;
    tree.add_file("core/agents/a.md", "---\ndependencies: ../tasks/b.md\n---\n")?;
    tree.add_file("core/tasks/b.md", "---\ndependencies: ../agents/a.md\n---\n")?;

    let result = resolve(tree.root(), &[], &ResolveOptions::default()).await?;

    assert_eq!(result.all_files.len(), 2);
    assert_eq!(result.graph.cycles().len(), 1);
    Ok(())
}

/// Three-node cycle across files that are not all seeds
#[tokio::test]
async fn test_three_node_cycle_terminates() -> Result<()> {
    let tree = ContentTreeFixture::new()?;
    tree.add_file("core/agents/a.md", "Next: bmad/ext/tasks/b.md")?;
    tree.add_file("ext/tasks/b.md", "Next: bmad/ext/templates/c.md")?;
    tree.add_file("ext/templates/c.md", "Back to bmad/core/agents/a.md")?;

    let result = resolve(tree.root(), &[], &ResolveOptions::default()).await?;

    assert_eq!(result.all_files.len(), 3);
    for rel in ["core/agents/a.md", "ext/tasks/b.md", "ext/templates/c.md"] {
        let path = tree.path(rel);
        assert_eq!(result.all_files.iter().filter(|f| **f == path).count(), 1, "{rel}");
    }

    let cycles = result.graph.cycles();
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].len(), 3);
    Ok(())
}

/// A file that names itself as a dependency
#[tokio::test]
async fn test_self_reference() -> Result<()> {
    let tree = ContentTreeFixture::new()?;
    tree.add_file("core/agents/self.md", "---\ndependencies: ./self.md\n---\n# Self\n")?;

    let result = resolve(tree.root(), &[], &ResolveOptions::default()).await?;

    assert_eq!(result.all_files, vec![tree.path("core/agents/self.md")]);
    assert_eq!(result.graph.cycles(), vec![vec![tree.path("core/agents/self.md")]]);
    Ok(())
}

/// A -> B, A -> C, B -> D, C -> D gives four files, not five
#[tokio::test]
async fn test_diamond_converges() -> Result<()> {
    let tree = ContentTreeFixture::new()?;
    tree.add_file("core/agents/a.md", "---\ndependencies: [../tasks/b.md, ../tasks/c.md]\n---\n")?;
    tree.add_file("core/tasks/b.md", "Uses @task-d")?;
    tree.add_file("core/tasks/c.md", "Uses @task-d")?;
    tree.add_file("core/tasks/d.md", "# D")?;

    let result = resolve(tree.root(), &[], &ResolveOptions::default()).await?;

    assert_eq!(result.all_files.len(), 4);
    let d = tree.path("core/tasks/d.md");
    assert_eq!(result.graph.references_from(&tree.path("core/tasks/b.md")), vec![d.clone()]);
    assert_eq!(result.graph.references_from(&tree.path("core/tasks/c.md")), vec![d]);
    Ok(())
}

/// Unresolvable references are recorded and the referrer stays primary
#[tokio::test]
async fn test_missing_references_are_tolerated() -> Result<()> {
    let tree = ContentTreeFixture::new()?;
    tree.add_file(
        "core/agents/a.md",
        "---\ndependencies: [\"{project-root}/bmad/core/tasks/gone.md\"]\n---\nAlso @task-nowhere and \"./nope.md\"\n",
    )?;

    let result = resolve(tree.root(), &[], &ResolveOptions::default()).await?;

    assert_eq!(result.primary_files.len(), 1);
    assert_eq!(result.all_files.len(), 1);

    let mut missing: Vec<&str> = result.missing.iter().map(|m| m.reference.as_str()).collect();
    missing.sort_unstable();
    assert_eq!(missing, vec!["./nope.md", "@task-nowhere", "{project-root}/bmad/core/tasks/gone.md"]);
    assert!(result.missing.iter().all(|m| m.source_file == tree.path("core/agents/a.md")));
    Ok(())
}

/// `exec="*"` is a placeholder, never a file
#[tokio::test]
async fn test_dynamic_exec_wildcard_is_ignored() -> Result<()> {
    let tree = ContentTreeFixture::new()?;
    tree.add_file("core/tasks/workflow.xml", "<task>\n  <step exec=\"*\">Dynamic</step>\n</task>\n")?;

    let result = resolve(tree.root(), &[], &ResolveOptions::default()).await?;

    assert_eq!(result.all_files, vec![tree.path("core/tasks/workflow.xml")]);
    assert!(result.all_files.iter().all(|f| !f.ends_with("*")));
    assert!(result.missing.is_empty());
    Ok(())
}

/// Running twice over the same tree gives the same answer
#[tokio::test]
async fn test_resolution_is_repeatable() -> Result<()> {
    let tree = ContentTreeFixture::new()?;
    tree.add_file("core/agents/a.md", "@task-b @task-c")?;
    tree.add_file("core/tasks/b.md", "@task-c")?;
    tree.add_file("core/tasks/c.md", "@agent-a")?;

    let options = ResolveOptions::default();
    let first = resolve(tree.root(), &[], &options).await?;
    let second = resolve(tree.root(), &[], &options).await?;

    assert_eq!(first.all_files, second.all_files);
    assert_eq!(first.dependencies, second.dependencies);
    assert_eq!(first.missing, second.missing);
    Ok(())
}
