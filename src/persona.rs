//! The assistant's persona: brand details and service catalogue rendered into
//! the system instruction sent with every provider call.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

/// Which half of the business a service belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceCategory {
    Security,
    Development,
}

impl ServiceCategory {
    /// Catalogue sections in the order they are presented.
    pub const ALL: [ServiceCategory; 2] = [ServiceCategory::Security, ServiceCategory::Development];

    pub const fn label(&self) -> &'static str {
        match self {
            ServiceCategory::Security => "Security",
            ServiceCategory::Development => "Development",
        }
    }
}

/// One offering in the service catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Service {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: ServiceCategory,
}

pub const SERVICES: &[Service] = &[
    Service {
        id: "cyber-security",
        title: "Cyber Security",
        description: "Advanced threat detection and mitigation strategies tailored for enterprise ecosystems.",
        category: ServiceCategory::Security,
    },
    Service {
        id: "pen-testing",
        title: "Penetration Testing",
        description: "Rigorous ethical hacking to identify vulnerabilities before malicious actors do.",
        category: ServiceCategory::Security,
    },
    Service {
        id: "web-dev",
        title: "Web Development",
        description: "Scalable, performant, and secure web applications built with modern frameworks.",
        category: ServiceCategory::Development,
    },
    Service {
        id: "mobile-dev",
        title: "Mobile App Development",
        description: "Native and cross-platform mobile experiences that put your business in customers' pockets.",
        category: ServiceCategory::Development,
    },
    Service {
        id: "email-security",
        title: "Email Security",
        description: "Zero-trust email protection to eliminate phishing and ransomware threats at the source.",
        category: ServiceCategory::Security,
    },
    Service {
        id: "mobile-security",
        title: "Mobile Security",
        description: "End-to-end encryption and device management for the mobile-first workforce.",
        category: ServiceCategory::Security,
    },
];

/// Brand details the persona speaks for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Persona {
    /// Company name
    pub brand: String,
    /// Name the assistant introduces itself with
    pub assistant_name: String,
    /// Official domain
    pub domain: String,
    /// Official contact email
    pub contact_email: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            brand: "ByteCode Labs".to_string(),
            assistant_name: "ByteBot".to_string(),
            domain: "bytecodelabsbd.com".to_string(),
            contact_email: "info@bytecodelabsbd.com".to_string(),
        }
    }
}

impl Persona {
    /// Services in the given category, in catalogue order.
    pub fn services(category: ServiceCategory) -> impl Iterator<Item = &'static Service> {
        SERVICES.iter().filter(move |s| s.category == category)
    }

    /// Render the system instruction.
    pub fn system_instruction(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(
            out,
            "You are {}, the AI representative for {}.",
            self.assistant_name, self.brand
        );
        let _ = writeln!(
            out,
            "{} is a premium software company specializing in:",
            self.brand
        );
        for category in ServiceCategory::ALL {
            let _ = writeln!(out, "{}:", category.label());
            for service in Self::services(category) {
                let _ = writeln!(out, "- {}: {}", service.title, service.description);
            }
        }
        out.push('\n');
        let _ = writeln!(out, "Official Domain: {}", self.domain);
        let _ = writeln!(out, "Official Contact Email: {}", self.contact_email);
        out.push('\n');
        out.push_str("Keep your tone professional, tech-savvy, and concise.\n");
        out.push_str("Encourage users to book a consultation for specific inquiries.\n");
        out.push_str(
            "If asked about pricing, mention it depends on the project scope and suggest a discovery call.",
        );

        out
    }
}
