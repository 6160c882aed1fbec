use chrono::{DateTime, Utc};

use crate::{
    types::{Currency, HoldingRow, Portfolio, UrlBuilderEntry},
    utils::format_money,
};

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<link rel=\"icon\" href=\"/favicon.ico\">\n\
         <link rel=\"stylesheet\" href=\"/style.css\">\n</head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        body
    )
}

fn signed_class(value: f64) -> &'static str {
    if value < 0.0 {
        "loss"
    } else {
        "gain"
    }
}

/// Form for the client-side URL builder. `/builder.js` turns the added rows
/// into `/?c=CUR&1=SYMBOL*AMOUNT*PRICE&...`; the symbol field suggests the
/// top assets of the latest refresh.
fn url_builder(currencies: &[Currency], entries: &[UrlBuilderEntry]) -> String {
    let mut html = String::from(
        "<h2>Build your portfolio URL</h2>\n<form id=\"builder\" class=\"builder\">\n\
         <select name=\"currency\">\n",
    );
    for currency in currencies {
        html.push_str(&format!("<option value=\"{0}\">{0}</option>\n", currency));
    }
    html.push_str(
        "</select>\n\
         <input name=\"symbol\" list=\"coins\" placeholder=\"BTC\" autocomplete=\"off\">\n\
         <input name=\"amount\" type=\"number\" step=\"any\" placeholder=\"Amount\">\n\
         <input name=\"price\" type=\"number\" step=\"any\" placeholder=\"Bought for\">\n\
         <button type=\"button\" id=\"add-holding\">Add</button>\n\
         <ol id=\"holdings\"></ol>\n\
         <button type=\"submit\">Show portfolio</button>\n</form>\n\
         <datalist id=\"coins\">\n",
    );
    for entry in entries {
        html.push_str(&format!(
            "<option value=\"{}\">{}</option>\n",
            escape(&entry.symbol),
            escape(&entry.name)
        ));
    }
    html.push_str("</datalist>\n<script src=\"/builder.js\"></script>\n");
    html
}

fn currency_list(currencies: &[Currency]) -> String {
    let mut html = String::from("<ul class=\"currencies\">\n");
    for currency in currencies {
        html.push_str(&format!("<li>{}</li>\n", currency));
    }
    html.push_str("</ul>\n");
    html
}

/// Instructions page shown when the query string is empty.
pub fn help_view(currencies: &[Currency], entries: &[UrlBuilderEntry]) -> String {
    let mut body = String::from(
        "<h1>Coin portfolio</h1>\n\
         <p>Describe your portfolio in the URL: the first parameter is the currency, \
         every other parameter is one purchase written as <code>SYMBOL*AMOUNT*PRICE</code>.</p>\n\
         <p>Example: <code>/?c=EUR&amp;1=BTC*2*1000&amp;2=ETH*10*250</code></p>\n\
         <h2>Supported currencies</h2>\n",
    );
    body.push_str(&currency_list(currencies));
    body.push_str(&url_builder(currencies, entries));
    layout("Coin portfolio", &body)
}

/// Shown when the first query parameter is not a supported currency.
pub fn error_view(input: &str, currencies: &[Currency], entries: &[UrlBuilderEntry]) -> String {
    let mut body = format!(
        "<h1>Unsupported currency</h1>\n\
         <p class=\"error\"><code>{}</code> is not a currency this page can convert to.</p>\n\
         <h2>Supported currencies</h2>\n",
        escape(input)
    );
    body.push_str(&currency_list(currencies));
    body.push_str(&url_builder(currencies, entries));
    layout("Unsupported currency", &body)
}

pub fn results_view(portfolio: &Portfolio, last_updated: Option<DateTime<Utc>>) -> String {
    let currency = portfolio.currency;
    let mut body = format!(
        "<h1>Portfolio in {}</h1>\n<table class=\"holdings\">\n<thead><tr>\
         <th>Coin</th><th>Amount</th><th>Bought for</th><th>Invested</th>\
         <th>Price now</th><th>Value now</th><th>Difference</th><th>%</th>\
         </tr></thead>\n<tbody>\n",
        currency
    );

    for row in &portfolio.rows {
        match row {
            HoldingRow::Valued(v) => body.push_str(&format!(
                "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{} {}</td><td>{} {}</td>\
                 <td>{} {}</td><td>{} {}</td><td>{} {}</td><td>{}</td></tr>\n",
                signed_class(v.difference),
                escape(&v.holding.coin_symbol),
                v.holding.amount_bought,
                v.holding.bought_for,
                currency,
                format_money(v.holding.invested),
                currency,
                v.current_value_of_one,
                currency,
                format_money(v.current_value_of_all),
                currency,
                format_money(v.difference),
                currency,
                v.percentage_difference,
            )),
            HoldingRow::Failed { segment, error } => body.push_str(&format!(
                "<tr class=\"failed\"><td>{}</td><td colspan=\"7\">{}</td></tr>\n",
                escape(segment),
                escape(&error.to_string())
            )),
        }
    }

    let totals = &portfolio.totals;
    body.push_str(&format!(
        "</tbody>\n<tfoot><tr class=\"{}\"><th colspan=\"3\">Total</th>\
         <td>{} {}</td><td></td><td>{} {}</td><td>{} {}</td><td>{}</td></tr></tfoot>\n</table>\n",
        signed_class(totals.difference_value),
        format_money(totals.invested_value),
        currency,
        format_money(totals.current_value),
        currency,
        format_money(totals.difference_value),
        currency,
        totals.percentage_difference,
    ));

    match last_updated {
        Some(at) => body.push_str(&format!(
            "<p class=\"updated\">Prices updated {}</p>\n",
            at.format("%Y-%m-%d %H:%M:%S UTC")
        )),
        None => body.push_str("<p class=\"updated\">Prices not available yet</p>\n"),
    }

    layout(&format!("Portfolio in {}", currency), &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Holding, HoldingError, PortfolioTotals, ValuedHolding};

    fn portfolio() -> Portfolio {
        Portfolio {
            currency: Currency::Eur,
            rows: vec![
                HoldingRow::Valued(ValuedHolding {
                    holding: Holding {
                        coin_symbol: "BTC".into(),
                        currency: Currency::Eur,
                        amount_bought: 2.0,
                        bought_for: 1000.0,
                        invested: 2000.0,
                    },
                    current_value_of_one: 1200.0,
                    current_value_of_all: 2400.0,
                    difference: 400.0,
                    percentage_difference: "+20%".into(),
                }),
                HoldingRow::Failed {
                    segment: "<b>*1*1".into(),
                    error: HoldingError::UnknownSymbol("<B>".into()),
                },
            ],
            totals: PortfolioTotals {
                invested_value: 2000.0,
                current_value: 2400.0,
                difference_value: 400.0,
                percentage_difference: "+20%".into(),
            },
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn results_show_rows_and_totals() {
        let html = results_view(&portfolio(), None);
        assert!(html.contains("<td>BTC</td>"));
        assert!(html.contains("2000.00 EUR"));
        assert!(html.contains("2400.00 EUR"));
        assert!(html.contains("400.00 EUR"));
        assert!(html.contains("+20%"));
        assert!(html.contains("Prices not available yet"));
    }

    #[test]
    fn failed_rows_are_escaped() {
        let html = results_view(&portfolio(), None);
        assert!(html.contains("&lt;b&gt;*1*1"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn help_lists_every_currency() {
        let entries = vec![UrlBuilderEntry {
            name: "Bitcoin".into(),
            symbol: "BTC".into(),
        }];
        let html = help_view(&Currency::ALL, &entries);
        for currency in Currency::ALL {
            assert!(html.contains(&format!("<li>{}</li>", currency)));
        }
        assert!(html.contains("<option value=\"BTC\">Bitcoin</option>"));
        assert!(html.contains("<input name=\"symbol\" list=\"coins\""));
        assert!(html.contains("<datalist id=\"coins\">"));
        assert!(html.contains("<option value=\"JPY\">JPY</option>"));
        assert!(html.contains("<script src=\"/builder.js\"></script>"));
    }

    #[test]
    fn error_view_echoes_input_safely() {
        let html = error_view("<script>", &Currency::ALL, &[]);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("list=\"coins\""));
    }
}
