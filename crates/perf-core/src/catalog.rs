//! Solution catalog: the single table of optimization techniques and their
//! per-metric factors.
//!
//! The simulator, the precomputed table and the API all read factors from one
//! `SolutionCatalog` value. The builtin table can be replaced at startup by a
//! TOML file with the same shape.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use contracts::{ImplementationCost, SolutionEntry, SolutionFactors, BASELINE_SOLUTION_ID};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate solution id: {0}")]
    DuplicateId(String),
    #[error("catalog has no `baseline` entry")]
    MissingBaseline,
    #[error("the `baseline` entry must use neutral factors")]
    NonNeutralBaseline,
    #[error("solution {id}: factor {factor} must be finite and non-negative, got {value}")]
    InvalidFactor {
        id: String,
        factor: &'static str,
        value: f64,
    },
    #[error("solution id must not be blank")]
    BlankId,
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    solutions: Vec<SolutionEntry>,
}

/// Registry of solution entries with indexes for lookup by id and category.
#[derive(Debug, Clone)]
pub struct SolutionCatalog {
    entries: Vec<SolutionEntry>,
    by_id: BTreeMap<String, usize>,
    by_category: BTreeMap<String, Vec<usize>>,
}

impl SolutionCatalog {
    /// Builds a catalog from entries, rejecting duplicates, blank ids, bad
    /// factors and a missing or non-neutral baseline.
    pub fn from_entries(entries: Vec<SolutionEntry>) -> Result<Self, CatalogError> {
        validate(&entries)?;
        Ok(Self::index(entries))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(raw)?;
        Self::from_entries(file.solutions)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// The thirteen builtin entries, baseline first.
    pub fn builtin() -> Self {
        Self::index(builtin_entries())
    }

    fn index(entries: Vec<SolutionEntry>) -> Self {
        let mut by_id = BTreeMap::new();
        let mut by_category: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            by_id.insert(entry.id.clone(), idx);
            by_category
                .entry(entry.category.clone())
                .or_default()
                .push(idx);
        }
        Self {
            entries,
            by_id,
            by_category,
        }
    }

    /// All entries in catalog order.
    pub fn entries(&self) -> &[SolutionEntry] {
        &self.entries
    }

    /// Entries other than the baseline, in catalog order.
    pub fn optimizations(&self) -> impl Iterator<Item = &SolutionEntry> {
        self.entries.iter().filter(|entry| !entry.is_baseline())
    }

    pub fn get(&self, id: &str) -> Option<&SolutionEntry> {
        self.by_id.get(id).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Factors for `id`; unknown ids get neutral factors.
    pub fn factors_for(&self, id: &str) -> SolutionFactors {
        self.get(id)
            .map(|entry| entry.factors)
            .unwrap_or(SolutionFactors::NEUTRAL)
    }

    pub fn by_category(&self, category: &str) -> Vec<&SolutionEntry> {
        self.by_category
            .get(category)
            .map(|idxs| idxs.iter().map(|&i| &self.entries[i]).collect())
            .unwrap_or_default()
    }

    pub fn categories(&self) -> Vec<&str> {
        self.by_category.keys().map(|s| s.as_str()).collect()
    }

    /// Ids in catalog order with the baseline first.
    pub fn solution_ids(&self) -> Vec<&str> {
        let mut ids = vec![BASELINE_SOLUTION_ID];
        ids.extend(self.optimizations().map(|entry| entry.id.as_str()));
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SolutionCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate(entries: &[SolutionEntry]) -> Result<(), CatalogError> {
    let mut seen = BTreeSet::new();
    for entry in entries {
        if entry.id.trim().is_empty() {
            return Err(CatalogError::BlankId);
        }
        if !seen.insert(entry.id.as_str()) {
            return Err(CatalogError::DuplicateId(entry.id.clone()));
        }
        if entry.is_baseline() && entry.factors != SolutionFactors::NEUTRAL {
            return Err(CatalogError::NonNeutralBaseline);
        }
        for (factor, value) in entry.factors.named() {
            if !value.is_finite() || value < 0.0 {
                return Err(CatalogError::InvalidFactor {
                    id: entry.id.clone(),
                    factor,
                    value,
                });
            }
        }
    }
    if !seen.contains(BASELINE_SOLUTION_ID) {
        return Err(CatalogError::MissingBaseline);
    }
    Ok(())
}

struct Builtin {
    id: &'static str,
    name: &'static str,
    category: &'static str,
    description: &'static str,
    principle: &'static str,
    cost: ImplementationCost,
    scenarios: &'static [&'static str],
    code_example: &'static str,
    factors: SolutionFactors,
}

impl From<Builtin> for SolutionEntry {
    fn from(value: Builtin) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name.to_string(),
            category: value.category.to_string(),
            description: value.description.to_string(),
            principle: value.principle.to_string(),
            implementation_cost: value.cost,
            applicable_scenarios: value.scenarios.iter().map(|s| s.to_string()).collect(),
            code_example: value.code_example.to_string(),
            factors: value.factors,
        }
    }
}

fn builtin_entries() -> Vec<SolutionEntry> {
    use ImplementationCost::{High, Low, Medium};

    vec![
        Builtin {
            id: BASELINE_SOLUTION_ID,
            name: "Baseline",
            category: "Baseline",
            description: "Unoptimized reference build",
            principle: "The page as shipped without any of the catalogued optimizations; every other solution is measured against it.",
            cost: Low,
            scenarios: &[],
            code_example: "",
            factors: SolutionFactors::NEUTRAL,
        },
        Builtin {
            id: "route-lazy-loading",
            name: "Route-level lazy loading",
            category: "Code splitting",
            description: "Split code per route to shrink the initial bundle",
            principle: "Dynamic import() splits the bundle at route boundaries, so code for a route is fetched only when the route is visited, cutting first-screen load time.",
            cost: Low,
            scenarios: &["Single-page applications", "Multi-page applications", "Large apps with many routes"],
            code_example: r#"// router/index.js
const routes = [
  {
    path: '/home',
    component: () => import('@/views/Home.vue')
  },
  {
    path: '/about',
    component: () => import('@/views/About.vue')
  }
]"#,
            factors: SolutionFactors::new(0.7, 0.6, 0.9, 1.0, 0.5),
        },
        Builtin {
            id: "component-lazy-loading",
            name: "Component-level lazy loading",
            category: "Code splitting",
            description: "Load components on demand",
            principle: "Async components and dynamic import defer loading a component until it is actually rendered, which suits heavy or below-the-fold components.",
            cost: Low,
            scenarios: &["Large components", "Dialogs and modals", "Below-the-fold components"],
            code_example: r#"// async component
const AsyncComponent = defineAsyncComponent(() =>
  import('./components/HeavyComponent.vue')
)"#,
            factors: SolutionFactors::new(0.8, 0.7, 0.9, 1.0, 0.6),
        },
        Builtin {
            id: "modern-image-format",
            name: "Modern image formats",
            category: "Asset optimization",
            description: "Serve WebP and AVIF images",
            principle: "WebP and AVIF reach the same visual quality as JPEG or PNG at 30-50% smaller file sizes.",
            cost: Medium,
            scenarios: &["Image-heavy pages", "E-commerce sites", "Content showcases"],
            code_example: r#"<picture>
  <source srcset="image.avif" type="image/avif">
  <source srcset="image.webp" type="image/webp">
  <img src="image.jpg" alt="description">
</picture>"#,
            factors: SolutionFactors::new(0.6, 0.5, 1.0, 1.0, 0.4),
        },
        Builtin {
            id: "responsive-image",
            name: "Responsive images",
            category: "Asset optimization",
            description: "Load images sized for the device",
            principle: "srcset and sizes let the browser pick an image matching pixel density and viewport width, so small screens never download large images.",
            cost: Low,
            scenarios: &["Mobile adaptation", "Responsive sites", "Image galleries"],
            code_example: r#"<img
  srcset="small.jpg 480w, medium.jpg 768w, large.jpg 1200w"
  sizes="(max-width: 768px) 100vw, 50vw"
  src="medium.jpg"
  alt="responsive image"
>"#,
            factors: SolutionFactors::new(0.7, 0.6, 1.0, 1.0, 0.5),
        },
        Builtin {
            id: "image-lazy-loading",
            name: "Image lazy loading",
            category: "Asset optimization",
            description: "Defer images outside the viewport",
            principle: "loading=\"lazy\" or an IntersectionObserver starts an image download only when it approaches the viewport, reducing initial requests.",
            cost: Low,
            scenarios: &["Long list pages", "Image galleries", "Content feeds"],
            code_example: r#"<img
  src="image.jpg"
  loading="lazy"
  alt="lazy image"
>"#,
            factors: SolutionFactors::new(0.5, 0.4, 1.0, 0.9, 0.3),
        },
        Builtin {
            id: "icon-optimization",
            name: "Icon and vector optimization",
            category: "Asset optimization",
            description: "Replace bitmap icons with SVG or icon fonts",
            principle: "SVG is small and scales losslessly; an icon font packs many icons into one file and saves HTTP requests.",
            cost: Low,
            scenarios: &["Icon-heavy interfaces", "Icons shown at many sizes", "Brand marks"],
            code_example: r#"<!-- SVG -->
<svg width="24" height="24">
  <path d="M12 2L2 7v10l10 5 10-5V7z"/>
</svg>

<!-- icon font -->
<i class="icon-home"></i>"#,
            factors: SolutionFactors::new(1.0, 0.9, 1.0, 1.0, 0.2),
        },
        Builtin {
            id: "virtual-list",
            name: "Virtual list",
            category: "Rendering optimization",
            description: "Render only the visible rows of a list",
            principle: "Virtual scrolling keeps only the rows inside the viewport in the DOM, which cuts node count for long lists and improves scrolling and memory use.",
            cost: Medium,
            scenarios: &["Long lists", "Data tables", "Infinite scroll"],
            code_example: r#"// vue-virtual-scroller
<virtual-list
  :data-key="'id'"
  :data-sources="items"
  :data-component="itemComponent"
/>"#,
            factors: SolutionFactors::new(0.9, 0.8, 0.8, 0.9, 0.7),
        },
        Builtin {
            id: "ssg",
            name: "SSG (static site generation)",
            category: "Rendering strategy",
            description: "Prerender every page at build time",
            principle: "All HTML is generated at build time and served as-is, with no server-side rendering on request, giving the fastest loads.",
            cost: High,
            scenarios: &["Mostly static sites", "Blogs", "Documentation", "Marketing pages"],
            code_example: r#"// nuxt.config.ts
export default defineNuxtConfig({
  ssr: true,
  nitro: {
    prerender: {
      routes: ['/']
    }
  }
})"#,
            factors: SolutionFactors::new(0.4, 0.3, 0.7, 1.0, 0.6),
        },
        Builtin {
            id: "ssr",
            name: "SSR (server-side rendering)",
            category: "Rendering strategy",
            description: "Render HTML on the server",
            principle: "Components run on the server to produce HTML, so the first response already contains the full content, improving first paint and SEO.",
            cost: High,
            scenarios: &["SEO-sensitive sites", "Strict first-screen budgets", "Dynamic content"],
            code_example: r#"export default defineNuxtConfig({
  ssr: true
})"#,
            factors: SolutionFactors::new(0.5, 0.4, 0.8, 1.0, 0.7),
        },
        Builtin {
            id: "dependency-pre-build",
            name: "Dependency pre-bundling",
            category: "Build optimization",
            description: "Pre-bundle third-party dependencies",
            principle: "The bundler pre-builds node_modules dependencies and converts CommonJS to ESM, speeding up both development and production builds.",
            cost: Low,
            scenarios: &["Many third-party libraries", "Vite projects", "Development builds"],
            code_example: r#"// vite.config.js
export default {
  optimizeDeps: {
    include: ['vue', 'vue-router']
  }
}"#,
            factors: SolutionFactors::new(0.9, 0.8, 0.9, 1.0, 0.8),
        },
        Builtin {
            id: "file-compression",
            name: "File compression",
            category: "Build optimization",
            description: "Gzip or Brotli static assets",
            principle: "Compressing static assets with Gzip or Brotli on the server removes 60-80% of transfer size.",
            cost: Low,
            scenarios: &["All web applications", "Many static assets", "CDN deployments"],
            code_example: r#"# nginx
gzip on;
gzip_types text/plain text/css application/json application/javascript;
gzip_min_length 1000;"#,
            factors: SolutionFactors::new(0.8, 0.7, 1.0, 1.0, 0.5),
        },
        Builtin {
            id: "http-cache",
            name: "HTTP caching",
            category: "Caching strategy",
            description: "Set HTTP cache headers deliberately",
            principle: "Cache-Control and ETag headers steer the browser cache, avoiding repeat downloads and speeding up return visits.",
            cost: Low,
            scenarios: &["Static assets", "Rarely changing content", "All web applications"],
            code_example: r#"Cache-Control: public, max-age=31536000, immutable
ETag: "33a64df551425fcc55e4d42a148795d9f25f89d4""#,
            factors: SolutionFactors::new(0.3, 0.2, 1.0, 1.0, 0.3),
        },
    ]
    .into_iter()
    .map(SolutionEntry::from)
    .collect()
}
