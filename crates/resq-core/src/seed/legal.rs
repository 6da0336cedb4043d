use crate::models::LegalInfo;

struct Entry {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    category: &'static str,
    details: &'static str,
    source: &'static str,
}

const LEGAL_INFO: &[Entry] = &[
    Entry {
        id: "1",
        title: "Right to File Zero FIR",
        description: "You can file an FIR at any police station regardless of jurisdiction",
        category: "police",
        details: "A Zero FIR can be filed at any police station regardless of where the incident occurred. The police station will then forward it to the appropriate jurisdiction. This is particularly helpful in cases of emergency or when the crime location is uncertain. The police cannot refuse to file a Zero FIR, and doing so is punishable under law.",
        source: "Section 154 of CrPC",
    },
    Entry {
        id: "2",
        title: "Protection Against Workplace Harassment",
        description: "Legal safeguards against sexual harassment at workplace",
        category: "workplace",
        details: "Every organization must have an Internal Complaints Committee (ICC). Employers must provide a safe working environment and display consequences of sexual harassment prominently. Complaints must be resolved within 90 days. The ICC should have a presiding officer who is a woman and at least 50% women members.",
        source: "Sexual Harassment of Women at Workplace Act, 2013",
    },
    Entry {
        id: "3",
        title: "Right to Privacy in Examination",
        description: "Right to be examined by a female doctor",
        category: "medical",
        details: "A woman has the right to be examined by a female doctor. In case a female doctor is not available, examination should be done in presence of a female attendant. This applies to all medical examinations, including those required for legal purposes.",
        source: "Medical Council of India Guidelines",
    },
    Entry {
        id: "4",
        title: "Right Against Domestic Violence",
        description: "Protection against physical, emotional, verbal, economic abuse",
        category: "domestic",
        details: "Women have the right to protection against any form of domestic violence, including physical, emotional, verbal, economic, and sexual abuse. This includes the right to reside in the shared household, seek protection orders, and claim compensation. The law also provides for immediate relief through Protection Officers.",
        source: "Protection of Women from Domestic Violence Act, 2005",
    },
    Entry {
        id: "5",
        title: "Right to Equal Pay",
        description: "Equal remuneration for equal work",
        category: "workplace",
        details: "Employers cannot discriminate in payment of remuneration between men and women workers for the same work or work of similar nature. Any violation can be reported to the labor department. This includes basic pay, allowances, and other monetary benefits.",
        source: "Equal Remuneration Act, 1976",
    },
    Entry {
        id: "6",
        title: "Right to Dignity at Police Station",
        description: "Cannot be called to police station after sunset",
        category: "police",
        details: "Women cannot be arrested after sunset and before sunrise. Women also have the right to not be physically present at the police station for interrogation. Police must interrogate women at their residence. A woman police officer must be present during interrogation.",
        source: "Section 46(4) CrPC",
    },
    Entry {
        id: "7",
        title: "Maternity Benefits",
        description: "Right to paid maternity leave and related benefits",
        category: "workplace",
        details: "Women are entitled to 26 weeks of paid maternity leave for first two children, and 12 weeks for subsequent children. Additional benefits include work from home options, crèche facilities in establishments with 50+ employees, and protection from dismissal during pregnancy.",
        source: "Maternity Benefit (Amendment) Act, 2017",
    },
    Entry {
        id: "8",
        title: "Right to Free Legal Aid",
        description: "Access to free legal services for protection of rights",
        category: "legal",
        details: "Women have the right to free legal aid regardless of their financial status. This includes representation in court, legal advice, and assistance in filing cases. Legal Services Authorities must provide quality legal representation and support.",
        source: "Legal Services Authorities Act, 1987",
    },
    Entry {
        id: "9",
        title: "Protection from Cyber Harassment",
        description: "Legal protection against online harassment and crimes",
        category: "cyber",
        details: "Women have legal protection against cyber stalking, harassment, bullying, and non-consensual sharing of private images. Perpetrators can face imprisonment and fines. Victims can report to cyber crime cells or file complaints online.",
        source: "Information Technology Act, 2000 (Amended 2008)",
    },
    Entry {
        id: "10",
        title: "Right to Property",
        description: "Equal rights in ancestral property",
        category: "property",
        details: "Women have equal rights in ancestral property as male heirs. They cannot be denied their share in ancestral property and have the right to sell or transfer their share. This applies to both married and unmarried women.",
        source: "Hindu Succession (Amendment) Act, 2005",
    },
    Entry {
        id: "11",
        title: "Protection from Dowry",
        description: "Legal safeguards against dowry demands",
        category: "domestic",
        details: "Demanding or giving dowry is a punishable offense. Women can file complaints against dowry demands or harassment. The law provides for imprisonment and fines for offenders. Protection officers must assist in filing complaints.",
        source: "Dowry Prohibition Act, 1961",
    },
    Entry {
        id: "12",
        title: "Right to Maintenance",
        description: "Right to financial support from spouse",
        category: "domestic",
        details: "Women have the right to claim maintenance from their spouse during and after marriage. This includes adequate financial support for basic needs and children's education. The amount is decided based on the spouse's income and standard of living.",
        source: "Section 125 CrPC",
    },
    Entry {
        id: "13",
        title: "Medical Termination Rights",
        description: "Right to safe and legal abortion",
        category: "medical",
        details: "Women have the right to safe and legal abortion up to 20 weeks of pregnancy, and up to 24 weeks in special cases. The decision requires consent only from the woman. Medical practitioners must maintain confidentiality.",
        source: "Medical Termination of Pregnancy Act, 1971 (Amended 2021)",
    },
    Entry {
        id: "14",
        title: "Protection at Night Workplace",
        description: "Special provisions for night shift workers",
        category: "workplace",
        details: "Women working night shifts must be provided with adequate security, transportation, and other facilities. Employers must ensure safe working conditions and obtain consent for night work. Regular safety audits are mandatory.",
        source: "Factories Act, 1948",
    },
    Entry {
        id: "15",
        title: "Right to Dignity in Media",
        description: "Protection against indecent representation",
        category: "cyber",
        details: "Women have protection against indecent representation in any form of media, including digital platforms. This covers advertisements, publications, and social media. Violations are punishable with imprisonment and fines.",
        source: "Indecent Representation of Women Act, 1986",
    },
];

pub fn legal_info() -> Vec<LegalInfo> {
    LEGAL_INFO
        .iter()
        .map(|e| LegalInfo {
            id: e.id.to_string(),
            title: e.title.to_string(),
            description: e.description.to_string(),
            category: e.category.to_string(),
            details: e.details.to_string(),
            source: Some(e.source.to_string()),
        })
        .collect()
}
