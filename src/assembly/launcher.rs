//! Drivers that run an element kernel over all elements of a region.
use crate::assembly::global::AssemblyTarget;
use crate::assembly::local::{ElementConnectivityAssembler, ElementKernel};
use crate::error::AssemblyError;
use crate::settings::{AssemblySettings, ExecutionPolicy, ReductionOp};
use crate::Real;
use kernelfem_paradis::coloring::sequential_greedy_coloring;
use kernelfem_paradis::{DisjointSubsets, Subsets};
use rayon::prelude::*;

/// A failure tagged with the element that raised it.
type ElementFailure = (usize, AssemblyError);

/// Combines two partial results so that the failure of the lowest element wins.
///
/// Failures are sticky and independent of the order of combination, so the outcome of a
/// parallel pass does not depend on scheduling.
fn combine<T: Real>(
    reduction: ReductionOp,
    a: Result<T, ElementFailure>,
    b: Result<T, ElementFailure>,
) -> Result<T, ElementFailure> {
    match (a, b) {
        (Ok(a), Ok(b)) => Ok(reduction.combine(a, b)),
        (Err(a), Err(b)) => Err(if a.0 <= b.0 { a } else { b }),
        (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
    }
}

/// Clears the target and logs if the pass failed.
fn finish_pass<T, A>(target: &A, result: Result<T, ElementFailure>) -> Result<T, AssemblyError>
where
    T: Real,
    A: ?Sized + AssemblyTarget<T>,
{
    result.map_err(|(element, error)| {
        target.clear();
        if error.is_recoverable() {
            log::warn!("Assembly pass aborted at element {element}: {error}");
        } else {
            log::error!("Assembly pass aborted at element {element}: {error}");
        }
        error
    })
}

/// Processes the given elements in order on the calling thread.
fn run_serial<T, K, A>(
    kernel: &K,
    elements: impl IntoIterator<Item = usize>,
    target: &A,
    reduction: ReductionOp,
) -> Result<T, ElementFailure>
where
    T: Real,
    K: ElementKernel<T>,
    A: ?Sized + AssemblyTarget<T>,
{
    let mut stack = kernel.create_stack();
    let mut reduced = reduction.identity();
    for element in elements {
        let value = kernel
            .process_element(element, &mut stack, target)
            .map_err(|error| (element, error))?;
        reduced = reduction.combine(reduced, value);
    }
    Ok(reduced)
}

/// Processes the given elements in parallel. Every element is processed, even after a failure.
fn run_parallel<T, K, A>(
    kernel: &K,
    elements: impl IndexedParallelIterator<Item = usize>,
    target: &A,
    reduction: ReductionOp,
    min_elements_per_task: usize,
) -> Result<T, ElementFailure>
where
    T: Real,
    K: ElementKernel<T>,
    A: ?Sized + AssemblyTarget<T>,
{
    elements
        .with_min_len(min_elements_per_task.max(1))
        .map_init(
            || kernel.create_stack(),
            |stack, element| {
                kernel
                    .process_element(element, stack, target)
                    .map_err(|error| (element, error))
            },
        )
        .reduce(|| Ok(reduction.identity()), |a, b| combine(reduction, a, b))
}

/// Runs the kernel over all elements with the policy given by `settings`.
///
/// Returns the reduction of the values returned by the kernel's `complete`. If any element
/// fails, the target is cleared and the error is returned.
pub fn launch<T, K, A>(kernel: &K, target: &A, settings: &AssemblySettings) -> Result<T, AssemblyError>
where
    T: Real,
    K: ElementKernel<T>,
    A: ?Sized + AssemblyTarget<T>,
{
    let num_elements = kernel.num_elements();
    log::debug!(
        "Launching {} kernel over {} elements with policy {:?}",
        kernel.element_type(),
        num_elements,
        settings.policy
    );
    let reduced = match settings.policy {
        ExecutionPolicy::Serial => launch_serial(kernel, target, settings.reduction),
        ExecutionPolicy::Parallel => {
            launch_parallel(kernel, target, settings.reduction, settings.min_elements_per_task)
        }
        ExecutionPolicy::Colored => {
            let colors = color_elements(kernel);
            launch_colored(kernel, &colors, target, settings.reduction, settings.min_elements_per_task)
        }
    }?;
    log::debug!("Launch over {} elements reduced to {:?}", num_elements, reduced);
    Ok(reduced)
}

/// Processes all elements in ascending order on the calling thread.
///
/// Stops at the first failing element.
pub fn launch_serial<T, K, A>(kernel: &K, target: &A, reduction: ReductionOp) -> Result<T, AssemblyError>
where
    T: Real,
    K: ElementKernel<T>,
    A: ?Sized + AssemblyTarget<T>,
{
    finish_pass(target, run_serial(kernel, 0..kernel.num_elements(), target, reduction))
}

/// Processes the elements serially in the given order.
///
/// Every element index must be in bounds and appear at most once. The order may omit elements.
pub fn launch_ordered<T, K, A>(
    kernel: &K,
    order: &[usize],
    target: &A,
    reduction: ReductionOp,
) -> Result<T, AssemblyError>
where
    T: Real,
    K: ElementKernel<T>,
    A: ?Sized + AssemblyTarget<T>,
{
    check_launch_order(order, kernel.num_elements())?;
    finish_pass(target, run_serial(kernel, order.iter().copied(), target, reduction))
}

fn check_launch_order(order: &[usize], num_elements: usize) -> Result<(), AssemblyError> {
    let mut visited = vec![false; num_elements];
    for &element in order {
        match visited.get_mut(element) {
            None => return Err(AssemblyError::ElementOutOfBounds { element, num_elements }),
            Some(true) => return Err(AssemblyError::DuplicateElement { element }),
            Some(seen) => *seen = true,
        }
    }
    Ok(())
}

/// Processes all elements in parallel with atomic scatter.
///
/// On failure, the error of the lowest failing element is returned.
pub fn launch_parallel<T, K, A>(
    kernel: &K,
    target: &A,
    reduction: ReductionOp,
    min_elements_per_task: usize,
) -> Result<T, AssemblyError>
where
    T: Real,
    K: ElementKernel<T>,
    A: ?Sized + AssemblyTarget<T>,
{
    let elements = (0..kernel.num_elements()).into_par_iter();
    finish_pass(
        target,
        run_parallel(kernel, elements, target, reduction, min_elements_per_task),
    )
}

/// Partitions the elements into colors such that no two elements of a color share a node.
pub fn color_elements(connectivity: &dyn ElementConnectivityAssembler) -> Vec<DisjointSubsets> {
    let mut subsets = Subsets::new();
    for element in 0..connectivity.num_elements() {
        subsets.push_with(|indices| {
            let begin = indices.len();
            indices.resize(begin + connectivity.element_node_count(element), usize::MAX);
            connectivity.populate_element_nodes(&mut indices[begin..], element);
        });
    }
    let colors = sequential_greedy_coloring(&subsets);
    log::trace!(
        "Colored {} elements with {} colors",
        connectivity.num_elements(),
        colors.len()
    );
    colors
}

/// Processes the colors one after another, and the elements of each color in parallel.
///
/// Within a color no two elements share a node, so each entry of the target receives its
/// contributions in a fixed order. Stops after the first color containing a failure, and
/// returns the error of that color's lowest failing element.
pub fn launch_colored<T, K, A>(
    kernel: &K,
    colors: &[DisjointSubsets],
    target: &A,
    reduction: ReductionOp,
    min_elements_per_task: usize,
) -> Result<T, AssemblyError>
where
    T: Real,
    K: ElementKernel<T>,
    A: ?Sized + AssemblyTarget<T>,
{
    let result = colors.iter().try_fold(reduction.identity(), |reduced, color| {
        let elements = color.par_labels().copied();
        let color_reduced = run_parallel(kernel, elements, target, reduction, min_elements_per_task)?;
        // Combine in color order so that the reduction is deterministic
        Ok(reduction.combine(reduced, color_reduced))
    });
    finish_pass(target, result)
}
