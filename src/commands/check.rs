//! Check command implementation.
//!
//! Validates system requirements and configuration.

use std::path::Path;

use crate::config::{validate_effective_config, Config};
use crate::error::{ProbeError, Result};
use crate::process::{collect_proc_entries, read_status_memory};

/// Validates system requirements and configuration.
pub fn command_check(memory: bool, proc: bool, all: bool, config: &Config) -> Result<()> {
    println!("🔍 Herakles Memory Probe - System Check");
    println!("=======================================");

    let proc_root = config.proc_root();
    let mut all_ok = true;

    // Check /proc filesystem
    if proc || all {
        println!("\n📁 Checking {} filesystem...", proc_root.display());
        all_ok &= check_proc_root(&proc_root);
    }

    // Check memory figures for our own process
    if memory || all {
        println!("\n💾 Checking memory metrics accessibility...");
        let own_path = proc_root.join(std::process::id().to_string());
        all_ok &= check_memory(&own_path);
    }

    // Check configuration
    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => {
            println!("   ✅ Configuration is valid");
        }
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }

    if let Some(test_file) = &config.test_data_file {
        println!(
            "\n🧪 Test data file configured: {} (live processes are ignored)",
            test_file.display()
        );
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed - system is ready");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review warnings");
        Err(ProbeError::Config("system check failed".into()))
    }
}

fn check_proc_root(proc_root: &Path) -> bool {
    if !proc_root.exists() {
        println!("   ❌ {} not found", proc_root.display());
        return false;
    }
    println!("   ✅ {} accessible", proc_root.display());

    match collect_proc_entries(proc_root, Some(5)) {
        Ok(entries) if !entries.is_empty() => {
            println!("   ✅ Can read {} process entries", entries.len());
            true
        }
        Ok(_) => {
            println!("   ❌ Cannot read any process entries");
            false
        }
        Err(e) => {
            println!("   ❌ Cannot list process entries: {}", e);
            false
        }
    }
}

fn check_memory(own_path: &Path) -> bool {
    match read_status_memory(own_path) {
        Ok(mem) if mem.vm_size > 0 => {
            println!(
                "   ✅ Status parsing successful: VmSize={}MB, VmSwap={}MB",
                mem.vm_size / 1024 / 1024,
                mem.vm_swap / 1024 / 1024
            );
            true
        }
        Ok(_) => {
            println!("   ❌ VmSize missing from {}", own_path.join("status").display());
            false
        }
        Err(e) => {
            println!("   ❌ Status parsing failed: {}", e);
            false
        }
    }
}
