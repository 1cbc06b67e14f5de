use dashboard::report::{Dashboard, Section};

pub fn format_count(value: usize) -> String {
    group_thousands(&value.to_string())
}

/// Brazilian real with two decimals, e.g. `R$ 1,234.56`.
pub fn format_currency(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (integer, decimals) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };

    format!("{sign}R$ {}.{decimals}", group_thousands(integer))
}

pub fn format_percentage(value: f64) -> String {
    format!("{value:.1}%")
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}

fn section_lines<T, F>(lines: &mut Vec<String>, title: &str, section: &Section<T>, render: F)
where
    F: FnOnce(&T, &mut Vec<String>),
{
    lines.push(String::new());
    lines.push(format!("== {title} =="));

    match section.data() {
        Some(data) => render(data, lines),
        None => lines.push(section.message().unwrap_or_default().to_string()),
    }
}

pub fn render_text(dashboard: &Dashboard) -> String {
    let mut lines = vec![format!(
        "Restaurant dashboard, generated {}",
        dashboard.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )];

    lines.push(String::new());
    lines.push("== Collections ==".to_string());
    for (name, count) in &dashboard.collections {
        lines.push(format!("{name:<14} {:>8}", format_count(*count)));
    }

    section_lines(&mut lines, "Orders", &dashboard.orders, |orders, lines| {
        let summary = &orders.summary;
        lines.push(format!("Total orders    {}", format_count(summary.total_orders)));
        lines.push(format!("Revenue         {}", format_currency(summary.revenue)));
        lines.push(format!(
            "Success rate    {}",
            format_percentage(summary.success_rate)
        ));
        lines.push(format!(
            "Average ticket  {}",
            format_currency(summary.average_ticket)
        ));

        lines.push("Statuses:".to_string());
        for status in &orders.statuses {
            lines.push(format!("  {:<14} {}", status.status, format_count(status.count)));
        }

        lines.push("Weekdays:".to_string());
        for day in &orders.weekdays {
            lines.push(format!("  {:<14} {}", day.label, format_count(day.count)));
        }
    });

    if let Some(restaurants) = &dashboard.restaurants {
        section_lines(&mut lines, "Restaurants", restaurants, |performance, lines| {
            lines.push("Top by revenue:".to_string());
            for (rank, entry) in performance.top_by_revenue.iter().enumerate() {
                lines.push(format!(
                    "  {:>2}. {} {}",
                    rank + 1,
                    entry.name,
                    format_currency(entry.revenue)
                ));
            }

            lines.push("Revenue by category:".to_string());
            match performance.revenue_by_category.data() {
                Some(categories) => {
                    for entry in categories {
                        lines.push(format!("  {} {}", entry.name, format_currency(entry.revenue)));
                    }
                }
                None => lines.push(format!(
                    "  {}",
                    performance.revenue_by_category.message().unwrap_or_default()
                )),
            }
        });
    }

    section_lines(&mut lines, "Reviews", &dashboard.reviews, |reviews, lines| {
        let summary = &reviews.summary;
        lines.push(format!("Average score      {:.2}", summary.average_score));
        lines.push(format!(
            "Total reviews      {}",
            format_count(summary.total_reviews)
        ));
        lines.push(format!(
            "Satisfaction rate  {}",
            format_percentage(summary.satisfaction_rate)
        ));
    });

    section_lines(&mut lines, "Dishes", &dashboard.dishes, |dishes, lines| {
        lines.push("Most expensive:".to_string());
        for dish in &dishes.top_by_price {
            lines.push(format!(
                "  {} {}",
                dish.name.as_deref().unwrap_or("(unnamed)"),
                format_currency(dish.price)
            ));
        }
    });

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use dashboard::{analytics::TOP_N, filters::OrderFilter, report::build_dashboard};
    use mongodb::bson::doc;
    use warehouse::{Collection, Tables};

    use super::{format_count, format_currency, format_percentage, render_text};

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "R$ 0.00");
        assert_eq!(format_currency(7.5), "R$ 7.50");
        assert_eq!(format_currency(1234.567), "R$ 1,234.57");
        assert_eq!(format_currency(-1500.0), "-R$ 1,500.00");
        assert_eq!(format_currency(-0.001), "R$ 0.00");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(50.0), "50.0%");
        assert_eq!(format_percentage(66.666), "66.7%");
    }

    #[test]
    fn test_render_text() {
        let mut tables = Tables::new();
        tables.insert(
            Collection::Restaurants,
            vec![doc! { "_id": "r1", "nome": "Forno da Serra", "categorias": ["pizza"] }],
        );
        tables.insert(
            Collection::Orders,
            vec![
                doc! { "restaurante_id": "r1", "status_pedido": "entregue", "valor_total": 1200.0, "data_hora_pedido": "2024-07-01 12:00:00" },
            ],
        );

        let text = render_text(&build_dashboard(&tables, &OrderFilter::default(), TOP_N));

        assert!(text.contains("Revenue         R$ 1,200.00"));
        assert!(text.contains("Success rate    100.0%"));
        assert!(text.contains("1. Forno da Serra R$ 1,200.00"));
        assert!(text.contains("No review data found."));
        assert!(text.contains("No dish data found."));
    }
}
