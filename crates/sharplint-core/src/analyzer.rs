//! File discovery and whole-project analysis.

use crate::config::Config;
use crate::document::Solution;
use crate::engine::RuleEngine;
use crate::registry::RuleRegistry;
use crate::rule::{Rule, RuleBox};
use crate::types::LintResult;
use rayon::prelude::*;
use sharplint_syntax::SyntaxTree;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing a C# source file.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Directory walk error.
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    registry: RuleRegistry,
    exclude_patterns: Vec<String>,
    include_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.registry.register(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.registry.register(rule);
        self
    }

    /// Adds every rule of `rules`, in order.
    #[must_use]
    pub fn rules<I: IntoIterator<Item = RuleBox>>(mut self, rules: I) -> Self {
        for rule in rules {
            self.registry.register(rule);
        }
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds an include glob pattern, matched against paths relative to the root.
    #[must_use]
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether to fail on parse errors (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be read or a glob
    /// pattern is invalid.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();
        let root = self.root.unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());
        let exclude = compile_patterns(&exclude_patterns)?;

        let mut include_patterns = self.include_patterns;
        include_patterns.extend(config.analyzer.include.iter().cloned());
        let include = compile_patterns(&include_patterns)?;

        Ok(Analyzer {
            root,
            engine: RuleEngine::new(self.registry).with_config(config),
            exclude_patterns,
            exclude,
            include,
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<glob::Pattern>, AnalyzerError> {
    patterns
        .iter()
        .map(|p| glob::Pattern::new(p).map_err(AnalyzerError::from))
        .collect()
}

/// Discovers C# files under a root, parses them into a [`Solution`] and runs
/// the rule engine over it.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    engine: RuleEngine,
    exclude_patterns: Vec<String>,
    exclude: Vec<glob::Pattern>,
    include: Vec<glob::Pattern>,
    fail_on_parse_error: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.engine.registry().len()
    }

    /// The engine used for analysis.
    #[must_use]
    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// Analyzes all files and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails, or if a file fails to parse
    /// and the analyzer was built with `fail_on_parse_error`.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        let solution = self.load_solution()?;
        let result = self.analyze_solution(&solution);
        info!(
            "Analysis complete: {} diagnostics in {} files",
            result.diagnostics.len(),
            result.files_checked
        );
        Ok(result)
    }

    /// Runs the engine over an already loaded solution.
    #[must_use]
    pub fn analyze_solution(&self, solution: &Solution) -> LintResult {
        match self.engine.config().analyzer.parallelism {
            Some(threads) => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(|| self.engine.analyze_solution(solution)),
                Err(e) => {
                    warn!("Falling back to the global thread pool: {e}");
                    self.engine.analyze_solution(solution)
                }
            },
            None => self.engine.analyze_solution(solution),
        }
    }

    /// Discovers and parses every source file into a solution.
    ///
    /// # Errors
    ///
    /// See [`Analyzer::analyze`].
    pub fn load_solution(&self) -> Result<Solution, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);
        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());

        let parsed: Vec<Result<(PathBuf, SyntaxTree), AnalyzerError>> = files
            .into_par_iter()
            .map(|path| {
                debug!("Parsing: {}", path.display());
                let content = std::fs::read_to_string(&path)?;
                let tree = SyntaxTree::parse(&content).map_err(|e| AnalyzerError::Parse {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                Ok((path, tree))
            })
            .collect();

        let mut solution = Solution::new();
        for entry in parsed {
            match entry {
                Ok((path, tree)) => {
                    solution.add_tree(path, tree);
                }
                Err(AnalyzerError::Parse { path, message }) => {
                    warn!("Failed to parse {}: {}", path.display(), message);
                    if self.fail_on_parse_error {
                        return Err(AnalyzerError::Parse { path, message });
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Ok(solution)
    }

    /// Discovers all C# source files to analyze, sorted by path.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut files = Vec::new();

        if self.engine.config().analyzer.respect_gitignore {
            for entry in ignore::WalkBuilder::new(&self.root).build() {
                let entry = entry?;
                let path = entry.path();
                if entry.file_type().is_some_and(|t| t.is_file()) && is_source_file(path) {
                    files.push(path.to_path_buf());
                }
            }
        } else {
            let pattern = format!("{}/**/*.cs", self.root.display());
            for entry in glob::glob(&pattern)? {
                files.push(entry.map_err(|e| AnalyzerError::Io(e.into_error()))?);
            }
        }

        files.retain(|path| {
            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                return false;
            }
            self.should_include(path)
        });
        files.sort();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        if self.exclude.iter().any(|p| p.matches(&path_str)) {
            return true;
        }

        // "**/bin/**" also matches ".../bin/..." when the pattern is not anchored.
        self.exclude_patterns.iter().any(|pattern| {
            let normalized = pattern.replace("**", "");
            !normalized.is_empty() && normalized != "/" && path_str.contains(&normalized)
        })
    }

    fn should_include(&self, path: &Path) -> bool {
        if self.include.is_empty() {
            return true;
        }
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let relative = relative.to_string_lossy();
        self.include.iter().any(|p| p.matches(&relative))
    }
}

fn is_source_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("cs"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_builder() {
        let analyzer = Analyzer::builder()
            .root(".")
            .exclude("**/bin/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.root().exists());
        assert_eq!(analyzer.rule_count(), 0);
    }

    #[test]
    fn test_exclude_patterns() {
        let analyzer = Analyzer::builder()
            .root(".")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.should_exclude(Path::new("/foo/bin/Debug/App.cs")));
        assert!(analyzer.should_exclude(Path::new("/foo/obj/App.AssemblyAttributes.cs")));
        assert!(!analyzer.should_exclude(Path::new("/foo/src/App.cs")));
    }

    #[test]
    fn test_invalid_glob() {
        let result = Analyzer::builder().root(".").exclude("[").build();
        assert!(matches!(result, Err(AnalyzerError::Glob(_))));
    }

    #[test]
    fn test_load_solution_discovers_cs_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("src")).expect("mkdir");
        fs::create_dir_all(dir.path().join("obj")).expect("mkdir");
        fs::write(dir.path().join("src/B.cs"), "class B { }").expect("write");
        fs::write(dir.path().join("src/A.cs"), "class A { }").expect("write");
        fs::write(dir.path().join("obj/Gen.cs"), "class Gen { }").expect("write");
        fs::write(dir.path().join("notes.txt"), "not C#").expect("write");

        let analyzer = Analyzer::builder()
            .root(dir.path())
            .build()
            .expect("analyzer");
        let solution = analyzer.load_solution().expect("solution");
        let names: Vec<_> = solution
            .documents()
            .filter_map(|d| d.path().file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["A.cs", "B.cs"]);

        let result = analyzer.analyze().expect("analysis");
        assert_eq!(result.files_checked, 2);
    }

    #[test]
    fn test_parse_failures() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("Ok.cs"), "class Ok { }").expect("write");
        fs::write(dir.path().join("Broken.cs"), "class Broken { void").expect("write");

        let lenient = Analyzer::builder().root(dir.path()).build().expect("analyzer");
        assert_eq!(lenient.load_solution().expect("solution").len(), 1);

        let strict = Analyzer::builder()
            .root(dir.path())
            .fail_on_parse_error(true)
            .build()
            .expect("analyzer");
        assert!(matches!(
            strict.load_solution(),
            Err(AnalyzerError::Parse { .. })
        ));
    }
}
