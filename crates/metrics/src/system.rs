//! Host information printed in the run header

use sysinfo::System;

/// Load generator host description
#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub cpu_name: String,
    pub cpu_cores: usize,
    pub memory_gb: f64,
    pub os: String,
    pub arch: String,
}

impl SystemInfo {
    /// Collect details of the local machine
    pub fn collect() -> Self {
        let sys = System::new_all();

        let cpu_name = sys
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .filter(|brand| !brand.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        let cpu_cores = sys.cpus().len();
        let memory_gb = sys.total_memory() as f64 / 1_073_741_824.0;

        let os = format!(
            "{} {}",
            System::name().unwrap_or_else(|| "Unknown".to_string()),
            System::os_version().unwrap_or_default()
        )
        .trim()
        .to_string();

        Self {
            cpu_name,
            cpu_cores,
            memory_gb,
            os,
            arch: std::env::consts::ARCH.to_string(),
        }
    }

    pub fn one_line(&self) -> String {
        format!(
            "{} ({}) | {} cores | {:.1} GB | {}",
            self.cpu_name, self.arch, self.cpu_cores, self.memory_gb, self.os
        )
    }
}
