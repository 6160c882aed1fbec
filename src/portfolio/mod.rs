use crate::{
    cache::RateCache,
    types::{
        Currency, Holding, HoldingError, HoldingRow, Portfolio, PortfolioTotals, ValuedHolding,
    },
    utils::{percentage_string, round_number},
};

const SEGMENT_SEPARATOR: char = '*';

/// Parses `SYMBOL*AMOUNT*PRICE`.
pub fn parse_holding(segment: &str, currency: Currency) -> Result<Holding, HoldingError> {
    let mut parts = segment.split(SEGMENT_SEPARATOR).map(str::trim);
    let (Some(symbol), Some(amount), Some(price)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(HoldingError::Malformed(segment.to_string()));
    };
    if symbol.is_empty() {
        return Err(HoldingError::Malformed(segment.to_string()));
    }

    let amount_bought = parse_number("amount", amount)?;
    let bought_for = parse_number("price", price)?;

    Ok(Holding {
        coin_symbol: symbol.to_ascii_uppercase(),
        currency,
        amount_bought,
        bought_for,
        invested: amount_bought * bought_for,
    })
}

fn parse_number(field: &'static str, value: &str) -> Result<f64, HoldingError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| HoldingError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

/// Values every segment against `price_of` and sums the valued rows.
///
/// Totals add up unrounded row values; rows are rounded afterwards for
/// display. Rows that fail to parse or price are kept with their error and
/// left out of the totals.
pub fn calculate<F>(segments: &[String], currency: Currency, price_of: F) -> Portfolio
where
    F: Fn(&str) -> Option<f64>,
{
    let mut invested_value = 0.0;
    let mut current_value = 0.0;

    let rows = segments
        .iter()
        .map(|segment| {
            let valued = parse_holding(segment, currency).and_then(|holding| {
                let current_value_of_one = price_of(&holding.coin_symbol)
                    .ok_or_else(|| HoldingError::UnknownSymbol(holding.coin_symbol.clone()))?;
                Ok((holding, current_value_of_one))
            });

            match valued {
                Ok((mut holding, current_value_of_one)) => {
                    let current_value_of_all = current_value_of_one * holding.amount_bought;
                    let difference = current_value_of_all - holding.invested;
                    let percentage_difference =
                        percentage_string(current_value_of_all, holding.invested);

                    invested_value += holding.invested;
                    current_value += current_value_of_all;

                    holding.invested = round_number(holding.invested);
                    HoldingRow::Valued(ValuedHolding {
                        holding,
                        current_value_of_one,
                        current_value_of_all: round_number(current_value_of_all),
                        difference: round_number(difference),
                        percentage_difference,
                    })
                }
                Err(error) => HoldingRow::Failed {
                    segment: segment.clone(),
                    error,
                },
            }
        })
        .collect();

    Portfolio {
        currency,
        rows,
        totals: totals(invested_value, current_value),
    }
}

fn totals(invested_value: f64, current_value: f64) -> PortfolioTotals {
    let invested_value = round_number(invested_value);
    let current_value = round_number(current_value);
    PortfolioTotals {
        invested_value,
        current_value,
        difference_value: round_number(current_value - invested_value),
        percentage_difference: percentage_string(current_value, invested_value),
    }
}

/// Values `segments` against the cached snapshot for `currency`.
///
/// This is the request read path: the snapshot is taken once, so every row is
/// priced from the same refresh even if the refresher swaps it mid-request.
/// [`RateCache::lookup`] prices a single symbol the same way.
pub async fn value_portfolio(cache: &RateCache, currency: Currency, segments: &[String]) -> Portfolio {
    let snapshot = cache.snapshot(currency).await;
    calculate(segments, currency, |symbol| {
        snapshot.as_ref().and_then(|s| s.price_of(symbol))
    })
}
