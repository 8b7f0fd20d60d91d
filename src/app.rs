use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use upset_data::{
    AppConfig, Attribute, DatasetCatalog, Diagnostic, Session, Set, Subset,
};

const USAGE: &str = "usage: upset-data <datasets.json> [--dataset N] [--activate NAME]... \
[--deactivate NAME]... [--config FILE] [--json]";

// ---------------------------------------------------------------------------
// Command-line front end
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Toggle {
    Activate(String),
    Deactivate(String),
}

#[derive(Debug)]
pub struct UpsetApp {
    catalog: PathBuf,
    config: AppConfig,
    toggles: Vec<Toggle>,
}

impl UpsetApp {
    /// Parse arguments (without the program name). Flags override `--config`.
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut catalog = None;
        let mut config_path = None;
        let mut dataset = None;
        let mut json = false;
        let mut toggles = Vec::new();

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--dataset" => {
                    let value = args.next().context("--dataset needs a value")?;
                    dataset = Some(value.parse::<usize>().with_context(|| format!("invalid dataset index '{value}'"))?);
                }
                "--activate" => toggles.push(Toggle::Activate(args.next().context("--activate needs a set name")?)),
                "--deactivate" => {
                    toggles.push(Toggle::Deactivate(args.next().context("--deactivate needs a set name")?))
                }
                "--config" => config_path = Some(PathBuf::from(args.next().context("--config needs a path")?)),
                "--json" => json = true,
                "-h" | "--help" => bail!("{USAGE}"),
                other if other.starts_with("--") => bail!("unknown option {other}\n{USAGE}"),
                other => {
                    if catalog.replace(PathBuf::from(other)).is_some() {
                        bail!("more than one dataset list given\n{USAGE}");
                    }
                }
            }
        }

        let mut config = match config_path {
            Some(path) => AppConfig::from_file(&path)?,
            None => AppConfig::default(),
        };
        if let Some(index) = dataset {
            config.dataset = index;
        }
        config.json |= json;

        Ok(UpsetApp {
            catalog: catalog.with_context(|| format!("missing dataset list\n{USAGE}"))?,
            config,
            toggles,
        })
    }

    pub fn run(&self) -> Result<()> {
        let catalog = DatasetCatalog::load(&self.catalog)?;
        let dataset = catalog.load_dataset(self.config.dataset)?;
        let mut session = Session::new(dataset, self.config.session.clone());
        self.apply_toggles(&mut session)?;

        if self.config.json {
            let subsets = session.subsets().to_vec();
            let report = Report {
                dataset: &session.dataset().name,
                diagnostics: &session.dataset().diagnostics,
                attributes: session.attributes(),
                sets: session.sets(),
                active: session.active_ids().iter().map(|id| id.bits()).collect(),
                subsets,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            for (index, label) in catalog.labels().iter().enumerate() {
                let marker = if index == self.config.dataset { '*' } else { ' ' };
                println!("{marker} [{index}] {label}");
            }
            println!();
            print_text_report(&mut session);
        }
        Ok(())
    }

    fn apply_toggles(&self, session: &mut Session) -> Result<()> {
        for toggle in &self.toggles {
            let (name, want_active) = match toggle {
                Toggle::Activate(name) => (name, true),
                Toggle::Deactivate(name) => (name, false),
            };
            let set = session
                .dataset()
                .set_by_name(name)
                .with_context(|| format!("no set named '{name}'"))?;
            if set.active != want_active {
                let id = set.id;
                session.toggle_set(id)?;
            }
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct Report<'a> {
    dataset: &'a str,
    diagnostics: &'a [Diagnostic],
    attributes: &'a [Attribute],
    sets: &'a [Set],
    active: Vec<u64>,
    subsets: Vec<Subset>,
}

fn print_text_report(session: &mut Session) {
    let dataset = session.dataset();
    println!("{}: {} items, {} sets", dataset.name, dataset.len(), dataset.sets.len());
    for diagnostic in &dataset.diagnostics {
        println!("  ! {diagnostic}");
    }
    for set in &dataset.sets {
        let marker = if set.active { 'x' } else { ' ' };
        println!("  [{marker}] {:>6} {} ({} items)", set.id.bits(), set.name, set.item_count);
    }

    let names: Vec<(u64, String)> = session
        .active_sets()
        .iter()
        .map(|s| (s.id.bits(), s.name.clone()))
        .collect();
    println!();
    println!("{:>8} {:>6} {:>6}  sets", "mask", "degree", "size");
    for subset in session.subsets() {
        let members: Vec<&str> = names
            .iter()
            .filter(|(bits, _)| subset.mask.bits() & bits != 0)
            .map(|(_, name)| name.as_str())
            .collect();
        println!("{:>8} {:>6} {:>6}  {}", subset.mask.bits(), subset.degree, subset.size, members.join(" & "));
    }
}
