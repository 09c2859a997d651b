//! Sidebar navigation shared by every panel page.

/// A panel page reachable from the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Dashboard,
    Commandes,
    Medicaments,
    Users,
    Settings,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Dashboard,
        Page::Commandes,
        Page::Medicaments,
        Page::Users,
        Page::Settings,
    ];

    /// Route name, without leading slash.
    pub fn route(self) -> &'static str {
        match self {
            Page::Dashboard => "index",
            Page::Commandes => "commandes",
            Page::Medicaments => "medicaments",
            Page::Users => "user",
            Page::Settings => "setting",
        }
    }

    pub fn from_route(route: &str) -> Option<Page> {
        Page::ALL.into_iter().find(|page| page.route() == route)
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Commandes => "Commandes",
            Page::Medicaments => "Medicament",
            Page::Users => "Utilisation",
            Page::Settings => "Paramètres",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    /// Font Awesome icon class.
    pub icon: &'static str,
    /// `None` for entries without a page yet.
    pub page: Option<Page>,
}

impl NavItem {
    pub fn href(&self) -> String {
        match self.page {
            Some(page) => format!("/{}", page.route()),
            None => "#".to_string(),
        }
    }
}

pub const SIDEBAR: [NavItem; 6] = [
    NavItem {
        label: "Dashboard",
        icon: "fas fa-home",
        page: Some(Page::Dashboard),
    },
    NavItem {
        label: "Commandes",
        icon: "fas fa-shopping-cart",
        page: Some(Page::Commandes),
    },
    NavItem {
        label: "Medicament",
        icon: "fas fa-capsules",
        page: Some(Page::Medicaments),
    },
    NavItem {
        label: "Utilisation",
        icon: "fas fa-users",
        page: Some(Page::Users),
    },
    NavItem {
        label: "Statistiques",
        icon: "fas fa-chart-bar",
        page: None,
    },
    NavItem {
        label: "Paramètres",
        icon: "fas fa-cog",
        page: Some(Page::Settings),
    },
];

/// Render the sidebar with `current` highlighted, Dashboard when `None`.
pub fn render_sidebar(current: Option<Page>) -> String {
    let active = current.unwrap_or(Page::Dashboard);
    let mut html = String::from(
        "<nav id=\"sidebar\" class=\"active\">\n\
         <div class=\"sidebar-header\">\n\
         <img src=\"assets/image/logo.png\" alt=\"Pharmatri+ Logo\" class=\"logo\">\n\
         <h3>Pharmatri+</h3>\n\
         </div>\n\
         <ul class=\"list-unstyled components\">\n",
    );

    for item in &SIDEBAR {
        if item.page == Some(active) {
            html.push_str("<li class=\"active\">");
        } else {
            html.push_str("<li>");
        }
        html.push_str(&format!(
            "<a href=\"{}\"><i class=\"{}\"></i> <span class=\"menu-text\">{}</span></a></li>\n",
            escape_html(&item.href()),
            escape_html(item.icon),
            escape_html(item.label)
        ));
    }

    html.push_str("</ul>\n</nav>");
    html
}

/// Escape the five HTML-special characters.
pub fn escape_html(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            _ => output.push(ch),
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidebar_has_six_fixed_entries() {
        let labels: Vec<_> = SIDEBAR.iter().map(|item| item.label).collect();
        assert_eq!(
            labels,
            vec![
                "Dashboard",
                "Commandes",
                "Medicament",
                "Utilisation",
                "Statistiques",
                "Paramètres"
            ]
        );
        let routes: Vec<_> = SIDEBAR.iter().map(NavItem::href).collect();
        assert_eq!(
            routes,
            vec!["/index", "/commandes", "/medicaments", "/user", "#", "/setting"]
        );
    }

    #[test]
    fn test_dashboard_active_by_default() {
        let html = render_sidebar(None);
        assert_eq!(html.matches("<li class=\"active\">").count(), 1);
        assert!(html.contains("<li class=\"active\"><a href=\"/index\">"));
        assert_eq!(html.matches("<li").count(), 6);
    }

    #[test]
    fn test_exactly_one_active_for_every_page() {
        for page in Page::ALL {
            let html = render_sidebar(Some(page));
            assert_eq!(html.matches("<li class=\"active\">").count(), 1);
            assert!(html.contains(&format!(
                "<li class=\"active\"><a href=\"/{}\">",
                page.route()
            )));
        }
    }

    #[test]
    fn test_route_lookup() {
        assert_eq!(Page::from_route("medicaments"), Some(Page::Medicaments));
        assert_eq!(Page::from_route("statistiques"), None);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">'&'</a>"),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
    }
}
