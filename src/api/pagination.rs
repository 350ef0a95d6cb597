use serde::Deserialize;

pub(crate) const fn default_limit() -> i64 {
    100
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    #[serde(default)]
    pub(crate) skip: i64,
    #[serde(default = "default_limit")]
    pub(crate) limit: i64,
}

impl ListQuery {
    pub(crate) fn skip(&self) -> i64 {
        self.skip.max(0)
    }

    pub(crate) fn limit(&self) -> i64 {
        self.limit.clamp(1, 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_clamped() {
        let query = ListQuery { skip: -5, limit: 0 };
        assert_eq!(query.skip(), 0);
        assert_eq!(query.limit(), 1);

        let query = ListQuery { skip: 10, limit: 5000 };
        assert_eq!(query.skip(), 10);
        assert_eq!(query.limit(), 1000);
    }
}
