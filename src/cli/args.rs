// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value, json};

#[derive(Parser, Debug)]
#[command(name = "kubelist")]
#[command(author, version, about = "List Kubernetes resources by loosely named kind, with compact status summaries")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Kubernetes context to use (defaults to the configured or current context)
    #[arg(short, long, global = true, value_name = "CONTEXT")]
    pub context: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Omit column headers in table output
    #[arg(long, global = true)]
    pub no_headers: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List resources of a kind (name, plural or short name, e.g. po, deploy, svc)
    List(ListArgs),

    /// Show every resource type whose API group contains a fragment
    Discover {
        /// Group fragment, e.g. flux, argo, istio
        group: String,
    },

    /// Run list_resources with a raw JSON argument object (read from stdin when omitted)
    Invoke {
        /// e.g. '{"kind": "Pod", "namespace": "default"}'
        arguments: Option<String>,
    },

    /// Update saved defaults in ~/.kubelist/config.json
    Config {
        /// Context to use by default
        #[arg(long)]
        default_context: Option<String>,

        /// Timeout in seconds when none is given
        #[arg(long)]
        default_timeout: Option<u64>,

        /// Output format used when --output is not given
        #[arg(long, value_enum)]
        default_output: Option<OutputFormat>,
    },
}

#[derive(ClapArgs, Debug)]
pub struct ListArgs {
    /// Kind, plural name or short name
    pub kind: String,

    /// Only consider API groups containing this fragment
    #[arg(short, long, value_name = "FRAGMENT")]
    pub group: Option<String>,

    /// Namespace to list from
    #[arg(short, long, conflicts_with = "all_namespaces")]
    pub namespace: Option<String>,

    /// List across all namespaces (the default when no namespace is given)
    #[arg(short = 'A', long)]
    pub all_namespaces: bool,

    /// Label selector, e.g. app=nginx,tier!=db
    #[arg(short = 'l', long)]
    pub selector: Option<String>,

    /// Field selector, e.g. status.phase=Running
    #[arg(long)]
    pub field_selector: Option<String>,

    /// Maximum number of items to return
    #[arg(long)]
    pub limit: Option<u32>,

    /// List timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Return complete objects instead of summaries
    #[arg(long)]
    pub details: bool,
}

impl ListArgs {
    /// The argument object the dispatch layer would hand to list_resources
    pub fn to_arguments(&self) -> Map<String, Value> {
        let mut args = Map::new();
        args.insert("kind".to_string(), json!(self.kind));
        if let Some(group) = &self.group {
            args.insert("groupFilter".to_string(), json!(group));
        }
        if let Some(ns) = self.namespace.as_ref().filter(|_| !self.all_namespaces) {
            args.insert("namespace".to_string(), json!(ns));
        }
        if let Some(selector) = &self.selector {
            args.insert("labelSelector".to_string(), json!(selector));
        }
        if let Some(selector) = &self.field_selector {
            args.insert("fieldSelector".to_string(), json!(selector));
        }
        if let Some(limit) = self.limit {
            args.insert("limit".to_string(), json!(limit));
        }
        if let Some(timeout) = self.timeout {
            args.insert("timeoutSeconds".to_string(), json!(timeout));
        }
        if self.details {
            args.insert("showDetails".to_string(), json!(true));
        }
        args
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Table,
}
