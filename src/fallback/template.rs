// Templated copy for the last fallback tier
//
// Built locally from company facts, so it is always available and always
// identical for the same topic.

use crate::config::constants::CompanyProfile;
use crate::prompt::Topic;

pub fn templated_copy(company: &CompanyProfile, topic: &Topic) -> String {
    let services = company
        .services
        .iter()
        .map(|s| format!("• {s}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Looking for expert help with {topic}? {name} is here for you.\n\n\
         Founded by {founder}, {name} builds {tagline_lower}. \
         When it comes to {topic}, our team brings practical experience \
         and a focus on results you can measure.\n\n\
         Our services include:\n{services}\n\n\
         Whatever stage your business is at, we can help you turn {topic} \
         into a competitive advantage.\n\n\
         Get in touch at {email} or call {phone}. Learn more at {website}.",
        name = company.name,
        founder = company.founder,
        tagline_lower = company.tagline.to_lowercase(),
        email = company.email,
        phone = company.phone,
        website = company.website,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::constants::COMPANY;

    #[test]
    fn test_contains_topic_and_company() {
        let topic = Topic::parse("inventory tracking").unwrap();
        let copy = templated_copy(&COMPANY, &topic);

        assert!(copy.contains("inventory tracking"));
        assert!(copy.contains(COMPANY.name));
        assert!(copy.contains(COMPANY.email));
        for service in COMPANY.services {
            assert!(copy.contains(service));
        }
    }

    #[test]
    fn test_multi_paragraph_and_deterministic() {
        let topic = Topic::parse("payments").unwrap();
        let copy = templated_copy(&COMPANY, &topic);
        assert!(copy.split("\n\n").count() >= 4);
        assert_eq!(copy, templated_copy(&COMPANY, &topic));
    }
}
