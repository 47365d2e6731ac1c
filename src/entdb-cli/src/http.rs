//! HTTP access to mod listings and archives (GameBanana, Everest, mirror)

use crate::config::Config;
use anyhow::{Context, Result};
use entdb::{Catalog, ModCandidate, ModRegistry, ModRepository};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::time::Duration;

/// Blocking client for every network call of a scan run
pub struct GameBananaClient {
    agent: ureq::Agent,
    mirror_url: String,
    file_list_url: String,
}

impl GameBananaClient {
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(30))
            .timeout_read(Duration::from_secs(300))
            .user_agent(concat!("entdb/", env!("CARGO_PKG_VERSION")))
            .build();

        Self {
            agent,
            mirror_url: config.mirror_url().to_string(),
            file_list_url: config.file_list_url().to_string(),
        }
    }

    fn get(&self, url: &str) -> entdb::Result<ureq::Response> {
        match self.agent.get(url).call() {
            Ok(resp) => Ok(resp),
            Err(ureq::Error::Status(code, resp)) => {
                let status = resp.status_text().to_string();
                Err(entdb::Error::transport(url, format!("{} {}", code, status)))
            }
            Err(e) => Err(entdb::Error::transport(url, e)),
        }
    }

    /// Fetch a text body without the default response size cap
    fn get_text(&self, url: &str) -> entdb::Result<String> {
        let mut body = String::new();
        self.get(url)?
            .into_reader()
            .read_to_string(&mut body)
            .map_err(|e| entdb::Error::transport(url, e))?;
        Ok(body)
    }

    /// Resolve the mods of interest from the catalog and the update registry.
    ///
    /// The updater index holds the URL of the registry, not the registry.
    pub fn fetch_candidates(&self, catalog_url: &str, updater_index_url: &str) -> Result<Vec<ModCandidate>> {
        let catalog = Catalog::from_json(&self.get_text(catalog_url)?)
            .with_context(|| format!("Failed to parse catalog from {}", catalog_url))?;

        let registry_url = self.get_text(updater_index_url)?.trim().to_string();
        tracing::debug!("Update registry at {}", registry_url);

        let registry = ModRegistry::from_yaml(&self.get_text(&registry_url)?)
            .with_context(|| format!("Failed to parse update registry from {}", registry_url))?;

        Ok(entdb::select_candidates(&catalog, &registry))
    }
}

impl ModRepository for GameBananaClient {
    fn has_editor_plugin(&mut self, file_id: u64) -> entdb::Result<bool> {
        let listing = self.get_text(&expand_template(&self.file_list_url, file_id))?;
        Ok(entdb::mentions_editor_plugin(&listing))
    }

    fn download_archive(&mut self, file_id: u64, dest: &Path) -> entdb::Result<()> {
        let url = expand_template(&self.mirror_url, file_id);
        let mut reader = self.get(&url)?.into_reader();
        let mut file = File::create(dest)?;
        io::copy(&mut reader, &mut file).map_err(|e| entdb::Error::transport(&url, e))?;
        Ok(())
    }
}

/// Substitute a file id into a `{id}` URL template
pub fn expand_template(template: &str, file_id: u64) -> String {
    template.replace("{id}", &file_id.to_string())
}
