//! Observations and their composition.
//!
//! An [`Observation`] extracts a labeled vector from the physics session.
//! [`ObservationFactory`] combines registered observations into the single flat
//! vector and space seen by an agent.
use crate::{error::SoloError, space::BoxSpace};
use anyhow::Result;
use log::debug;
use ndarray::{concatenate, Array1, Axis};
use std::rc::Rc;

/// An observation of a body in the physics session.
///
/// Implementors are bound to a body at construction. The session is handed to
/// every query, so an observation never outlives or owns it.
///
/// `labels()`, `observation_space()` and `compute()` must agree in length;
/// [`ObservationFactory::register_observation`] rejects observations that don't.
pub trait Observation<C: ?Sized> {
    /// The space of the values returned by [`Observation::compute`].
    ///
    /// It may change over an episode, e.g. when it is read from the backend.
    fn observation_space(&self, client: &C) -> Result<BoxSpace>;

    /// One label per dimension of the observation.
    fn labels(&self, client: &C) -> Result<Vec<String>>;

    /// Computes the observation for the current state.
    ///
    /// This may advance internal state of the observation, such as a filter.
    fn compute(&mut self, client: &C) -> Result<Array1<f64>>;
}

/// Combines registered observations in registration order.
pub struct ObservationFactory<C: ?Sized> {
    observations: Vec<Box<dyn Observation<C>>>,
    obs_space: Option<Rc<BoxSpace>>,
}

impl<C: ?Sized> Default for ObservationFactory<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> ObservationFactory<C> {
    /// Creates an empty factory.
    pub fn new() -> Self {
        Self {
            observations: Vec::new(),
            obs_space: None,
        }
    }

    /// The number of registered observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Returns `true` if no observation is registered.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Registers an observation to be computed.
    ///
    /// The observation is computed once against `client` to check that its
    /// labels, space and values have the same length. On mismatch the
    /// observation is rejected with [`SoloError::Validation`].
    pub fn register_observation<O>(&mut self, mut obs: O, client: &C) -> Result<()>
    where
        O: Observation<C> + 'static,
    {
        let lbl_len = obs.labels(client)?.len();
        let obs_space_len = obs.observation_space(client)?.len();
        let obs_len = obs.compute(client)?.len();

        if lbl_len != obs_space_len {
            return Err(SoloError::Validation(format!(
                "Labels have length {} != obs space len {}",
                lbl_len, obs_space_len
            ))
            .into());
        }
        if lbl_len != obs_len {
            return Err(SoloError::Validation(format!(
                "Labels have length {} != obs len {}",
                lbl_len, obs_len
            ))
            .into());
        }

        debug!("Registered observation with {} dimensions", lbl_len);
        self.observations.push(Box::new(obs));
        self.obs_space = None;

        Ok(())
    }

    /// Computes all of the observations for the current state.
    ///
    /// Returns the concatenated values and labels, where `labels[i]` names
    /// `values[i]`.
    pub fn get_obs(&mut self, client: &C) -> Result<(Array1<f64>, Vec<String>)> {
        if self.observations.is_empty() {
            return Err(SoloError::EmptyRegistry(
                "Need to register at least one observation instance".to_string(),
            )
            .into());
        }

        let mut all_obs = Vec::with_capacity(self.observations.len());
        let mut labels = Vec::new();

        for obs in self.observations.iter_mut() {
            all_obs.push(obs.compute(client)?);
            labels.extend(obs.labels(client)?);
        }

        let views: Vec<_> = all_obs.iter().map(|o| o.view()).collect();
        let values = concatenate(Axis(0), &views)?;

        Ok((values, labels))
    }

    /// The combined space of the registered observations.
    ///
    /// The space is cached. It is rebuilt from the current spaces of the
    /// observations if `regenerate` is `true` or no space has been cached since
    /// the last registration.
    pub fn get_observation_space(&mut self, client: &C, regenerate: bool) -> Result<Rc<BoxSpace>> {
        if self.observations.is_empty() {
            return Err(SoloError::EmptyRegistry(
                "Can't generate an empty observation space".to_string(),
            )
            .into());
        }

        if let (Some(space), false) = (&self.obs_space, regenerate) {
            return Ok(space.clone());
        }

        let spaces = self
            .observations
            .iter()
            .map(|obs| obs.observation_space(client))
            .collect::<Result<Vec<_>>>()?;
        let space = Rc::new(BoxSpace::concat(spaces.iter()));
        self.obs_space = Some(space.clone());

        Ok(space)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::cell::Cell;

    /// Stand-in for a session: a counter of space queries.
    #[derive(Default)]
    struct Client {
        space_queries: Cell<usize>,
    }

    struct TestObs {
        values: Vec<f64>,
        labels: Vec<&'static str>,
        space_len: usize,
    }

    impl TestObs {
        fn new(values: Vec<f64>, labels: Vec<&'static str>) -> Self {
            let space_len = labels.len();
            Self {
                values,
                labels,
                space_len,
            }
        }

        fn space_len(mut self, n: usize) -> Self {
            self.space_len = n;
            self
        }
    }

    impl Observation<Client> for TestObs {
        fn observation_space(&self, client: &Client) -> Result<BoxSpace> {
            client.space_queries.set(client.space_queries.get() + 1);
            BoxSpace::uniform(self.space_len, -10.0, 10.0)
        }

        fn labels(&self, _client: &Client) -> Result<Vec<String>> {
            Ok(self.labels.iter().map(|s| s.to_string()).collect())
        }

        fn compute(&mut self, _client: &Client) -> Result<Array1<f64>> {
            Ok(Array1::from(self.values.clone()))
        }
    }

    /// Returns a value that grows at every call.
    struct CountingObs {
        count: f64,
    }

    impl Observation<Client> for CountingObs {
        fn observation_space(&self, _client: &Client) -> Result<BoxSpace> {
            BoxSpace::uniform(1, 0.0, f64::INFINITY)
        }

        fn labels(&self, _client: &Client) -> Result<Vec<String>> {
            Ok(vec!["count".to_string()])
        }

        fn compute(&mut self, _client: &Client) -> Result<Array1<f64>> {
            self.count += 1.0;
            Ok(array![self.count])
        }
    }

    fn assert_validation(result: Result<()>) {
        let err = result.unwrap_err();
        assert!(
            matches!(err.downcast_ref::<SoloError>(), Some(SoloError::Validation(_))),
            "{:?}",
            err
        );
    }

    fn assert_empty<T: std::fmt::Debug>(result: Result<T>) {
        let err = result.unwrap_err();
        assert!(
            matches!(err.downcast_ref::<SoloError>(), Some(SoloError::EmptyRegistry(_))),
            "{:?}",
            err
        );
    }

    #[test]
    fn test_empty_factory() {
        let client = Client::default();
        let mut factory = ObservationFactory::new();

        assert_empty(factory.get_obs(&client));
        assert_empty(factory.get_observation_space(&client, false));
        assert_empty(factory.get_observation_space(&client, true));
    }

    #[test]
    fn test_register_mismatches() {
        let client = Client::default();
        let mut factory = ObservationFactory::new();

        // labels != space
        assert_validation(
            factory.register_observation(TestObs::new(vec![1.0, 2.0], vec!["a", "b"]).space_len(3), &client),
        );
        // labels != values, space == labels
        assert_validation(factory.register_observation(TestObs::new(vec![1.0], vec!["a", "b"]), &client));
        // values == space, labels differ
        assert_validation(
            factory.register_observation(TestObs::new(vec![1.0], vec!["a", "b"]).space_len(1), &client),
        );
        // all three differ
        assert_validation(
            factory.register_observation(TestObs::new(vec![1.0], vec!["a", "b"]).space_len(3), &client),
        );

        assert!(factory.is_empty());
    }

    #[test]
    fn test_get_obs_concatenates_in_order() -> Result<()> {
        let client = Client::default();
        let mut factory = ObservationFactory::new();
        factory.register_observation(TestObs::new(vec![1.0, 2.0], vec!["a", "b"]), &client)?;
        factory.register_observation(TestObs::new(vec![3.0], vec!["c"]), &client)?;
        factory.register_observation(TestObs::new(vec![4.0, 5.0, 6.0], vec!["d", "e", "f"]), &client)?;

        let (values, labels) = factory.get_obs(&client)?;
        assert_eq!(values, array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(labels, vec!["a", "b", "c", "d", "e", "f"]);
        assert_eq!(factory.len(), 3);

        Ok(())
    }

    #[test]
    fn test_compute_called_every_query() -> Result<()> {
        let client = Client::default();
        let mut factory = ObservationFactory::new();
        factory.register_observation(CountingObs { count: 0.0 }, &client)?;

        // Registration computes once.
        assert_eq!(factory.get_obs(&client)?.0, array![2.0]);
        assert_eq!(factory.get_obs(&client)?.0, array![3.0]);

        Ok(())
    }

    #[test]
    fn test_observation_space_cache() -> Result<()> {
        let client = Client::default();
        let mut factory = ObservationFactory::new();
        factory.register_observation(TestObs::new(vec![1.0, 2.0], vec!["a", "b"]), &client)?;
        factory.register_observation(TestObs::new(vec![3.0], vec!["c"]), &client)?;
        let queries = client.space_queries.get();

        let space = factory.get_observation_space(&client, false)?;
        assert_eq!(space.len(), 3);
        assert_eq!(client.space_queries.get(), queries + 2);

        let cached = factory.get_observation_space(&client, false)?;
        assert!(Rc::ptr_eq(&space, &cached));
        assert_eq!(client.space_queries.get(), queries + 2);

        let regenerated = factory.get_observation_space(&client, true)?;
        assert!(!Rc::ptr_eq(&space, &regenerated));
        assert_eq!(*space, *regenerated);
        assert_eq!(client.space_queries.get(), queries + 4);

        Ok(())
    }

    #[test]
    fn test_registration_invalidates_cache() -> Result<()> {
        let client = Client::default();
        let mut factory = ObservationFactory::new();
        factory.register_observation(TestObs::new(vec![1.0], vec!["a"]), &client)?;
        assert_eq!(factory.get_observation_space(&client, false)?.len(), 1);

        factory.register_observation(TestObs::new(vec![2.0, 3.0], vec!["b", "c"]), &client)?;
        assert_eq!(factory.get_observation_space(&client, false)?.len(), 3);

        Ok(())
    }
}
