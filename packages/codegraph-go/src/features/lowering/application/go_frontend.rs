//! Go frontend use case
//!
//! Parses and lowers single files or whole project directories. Each file
//! gets its own scope manager, node factory and graph, so files can be
//! lowered on the rayon pool without sharing mutable state.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::FrontendConfig;
use crate::features::cpg::NodeFactory;
use crate::features::lowering::domain::{FileContext, LoweredFile, ProjectLowering};
use crate::features::lowering::infrastructure::LoweringContext;
use crate::features::manifest::{GoModReader, ModuleManifestReader};
use crate::features::parsing::domain::SourceFile;
use crate::features::parsing::ports::SyntaxSource;
use crate::features::parsing::TreeSitterGoParser;
use crate::features::scope::{ScopeManager, ScopeStack};
use crate::shared::models::{FrontendError, Result};

const GO_EXTENSION: &str = "go";
const TEST_FILE_SUFFIX: &str = "_test.go";

/// Go frontend: syntax source + manifest reader + configuration
pub struct GoFrontend<P: SyntaxSource = TreeSitterGoParser, M: ModuleManifestReader = GoModReader> {
    parser: P,
    manifest: M,
    config: FrontendConfig,
}

impl GoFrontend {
    /// Tree-sitter parser and `go.mod` reader, after validating `config`
    pub fn new(config: FrontendConfig) -> Result<Self> {
        config.validate()?;
        let manifest = GoModReader::new(config.manifest_file.clone());
        Ok(Self::with_parts(TreeSitterGoParser::new(), manifest, config))
    }
}

impl<P: SyntaxSource, M: ModuleManifestReader> GoFrontend<P, M> {
    pub fn with_parts(parser: P, manifest: M, config: FrontendConfig) -> Self {
        Self {
            parser,
            manifest,
            config,
        }
    }

    pub fn config(&self) -> &FrontendConfig {
        &self.config
    }

    /// Parse and lower one in-memory file. The namespace path is the
    /// package name.
    pub fn lower_source(&self, source: &str, path: &str) -> Result<LoweredFile> {
        let file = self.parser.parse(source, path)?;
        let mut scopes = ScopeStack::new();
        self.lower_syntax(&file, source, path, &mut scopes, None)
    }

    /// Lower an already parsed file with a caller-provided scope manager
    pub fn lower_syntax(
        &self,
        file: &SourceFile,
        source: &str,
        path: &str,
        scopes: &mut dyn ScopeManager,
        namespace_path: Option<&str>,
    ) -> Result<LoweredFile> {
        let start = Instant::now();
        debug!(file = path, package = %file.package.name, "lowering file");

        let mut file_ctx = FileContext::new(path, file.package.name.clone());
        if let Some(namespace_path) = namespace_path {
            file_ctx = file_ctx.with_namespace_path(namespace_path);
        }
        let package = file_ctx.package.clone();
        let namespace_path = file_ctx.namespace_path.clone();
        let file_path = file_ctx.path.clone();

        let factory = NodeFactory::new(
            source,
            file_path.clone(),
            self.config.language.as_str(),
            file.comments.clone(),
            self.config.attach_comments,
        );
        let mut ctx = LoweringContext::new(factory, scopes, file_ctx, &self.config);
        let (root, namespace) = ctx.lower_source_file(file)?;
        let (factory, problems, suppressed_problems) = ctx.into_parts();
        let graph = factory.finish();

        debug!(
            file = path,
            nodes = graph.len(),
            problems = problems.len() + suppressed_problems,
            elapsed_us = start.elapsed().as_micros() as u64,
            "lowered file"
        );
        Ok(LoweredFile {
            path: file_path,
            package,
            namespace_path,
            graph,
            root,
            namespace,
            problems,
            suppressed_problems,
        })
    }

    /// Read and lower one file. With a project root, the location path is
    /// root-relative and the namespace path is qualified by the manifest's
    /// module path.
    pub fn lower_file(&self, path: &Path, project_root: Option<&Path>) -> Result<LoweredFile> {
        let module_path = match project_root {
            Some(root) => self.manifest.read_module_path(root)?,
            None => None,
        };
        self.lower_file_in(path, project_root, module_path.as_deref())
    }

    fn lower_file_in(
        &self,
        path: &Path,
        project_root: Option<&Path>,
        module_path: Option<&str>,
    ) -> Result<LoweredFile> {
        let source = std::fs::read_to_string(path)?;
        let relative = project_root
            .and_then(|root| path.strip_prefix(root).ok())
            .unwrap_or(path);
        let display = to_slash(relative);

        let file = self.parser.parse(&source, &display)?;
        let namespace_path = module_path.map(|module| {
            let dir = relative.parent().map(to_slash).unwrap_or_default();
            if dir.is_empty() {
                module.to_string()
            } else {
                format!("{}/{}", module, dir)
            }
        });

        let mut scopes = ScopeStack::new();
        self.lower_syntax(&file, &source, &display, &mut scopes, namespace_path.as_deref())
    }

    /// Lower every `.go` file under `root`. A failing file is recorded and
    /// does not stop the others.
    pub fn lower_project(&self, root: &Path) -> Result<ProjectLowering> {
        let start = Instant::now();
        let module_path = self.manifest.read_module_path(root)?;
        let files = self.discover_files(root)?;
        info!(
            root = %root.display(),
            files = files.len(),
            module = module_path.as_deref().unwrap_or("-"),
            "lowering project"
        );

        let lower = |path: &PathBuf| {
            let result = self.lower_file_in(path, Some(root), module_path.as_deref());
            (path.clone(), result)
        };
        let results: Vec<(PathBuf, Result<LoweredFile>)> = if self.config.parallel {
            files.par_iter().map(lower).collect()
        } else {
            files.iter().map(lower).collect()
        };

        let mut project = ProjectLowering {
            module_path,
            ..ProjectLowering::default()
        };
        for (path, result) in results {
            match result {
                Ok(file) => project.files.push(file),
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "failed to lower file");
                    project.failures.push((to_slash(&path), e));
                }
            }
        }

        info!(
            files = project.files.len(),
            failures = project.failures.len(),
            nodes = project.node_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "lowered project"
        );
        Ok(project)
    }

    /// `.go` files under `root`, sorted, skipping excluded directories and
    /// (unless configured) `_test.go` files
    pub fn discover_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !e.file_type().is_dir()
                    || !self.config.is_excluded_dir(&e.file_name().to_string_lossy())
            })
        {
            let entry = entry.map_err(|e| {
                FrontendError::collaborator(format!("walk error under {}: {}", root.display(), e))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let is_go = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(GO_EXTENSION));
            if !is_go || !self.parser.supports_extension(GO_EXTENSION) {
                continue;
            }
            let is_test = path
                .file_name()
                .is_some_and(|n| n.to_string_lossy().ends_with(TEST_FILE_SUFFIX));
            if is_test && !self.config.include_test_files {
                continue;
            }
            files.push(path.to_path_buf());
        }
        files.sort();
        Ok(files)
    }
}

/// Path with `/` separators regardless of platform
fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
